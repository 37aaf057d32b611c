//! Wire codec for probe target payloads.
//!
//! The remote execution channel rejects action parameters containing
//! literal `{`/`}`, so a unit map travels as `(id=addr,id=addr)` in
//! unit-id order, a unit without an address as a bare `id`. The
//! structural characters `( ) , = \` are `\`-escaped wherever they
//! occur inside an id or address, so arbitrary values round-trip
//! without corrupting entry boundaries. All escaping lives here; no
//! other module touches the encoded form.

use nethealth_common::error::AssessError;
use nethealth_common::model::target::UnitAddresses;

const STRUCTURAL: &[char] = &['(', ')', ',', '=', '\\'];

pub fn encode_units(units: &UnitAddresses) -> String {
    let mut out = String::from("(");
    for (i, (unit_id, address)) in units.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_escaped(&mut out, unit_id);
        if let Some(addr) = address {
            out.push('=');
            push_escaped(&mut out, addr);
        }
    }
    out.push(')');
    out
}

pub fn decode_units(encoded: &str) -> Result<UnitAddresses, AssessError> {
    let inner = encoded
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| payload_error("payload is not bracket-delimited"))?;

    let mut units = UnitAddresses::new();
    if inner.is_empty() {
        return Ok(units);
    }

    let mut unit_id = String::new();
    let mut address: Option<String> = None;
    let mut chars = inner.chars();

    loop {
        let Some(ch) = chars.next() else {
            finish_entry(&mut units, &mut unit_id, &mut address)?;
            break;
        };
        match ch {
            '\\' => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| payload_error("dangling escape at end of payload"))?;
                field(&mut unit_id, &mut address).push(escaped);
            }
            ',' => finish_entry(&mut units, &mut unit_id, &mut address)?,
            '=' if address.is_none() => address = Some(String::new()),
            '(' | ')' => return Err(payload_error("unescaped bracket inside payload")),
            _ => field(&mut unit_id, &mut address).push(ch),
        }
    }

    Ok(units)
}

fn push_escaped(out: &mut String, raw: &str) {
    for ch in raw.chars() {
        if STRUCTURAL.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
}

/// The field currently being read: the address once `=` was seen, the
/// unit id before that.
fn field<'a>(unit_id: &'a mut String, address: &'a mut Option<String>) -> &'a mut String {
    match address {
        Some(addr) => addr,
        None => unit_id,
    }
}

fn finish_entry(
    units: &mut UnitAddresses,
    unit_id: &mut String,
    address: &mut Option<String>,
) -> Result<(), AssessError> {
    if unit_id.is_empty() {
        return Err(payload_error("entry with an empty unit id"));
    }
    let id = std::mem::take(unit_id);
    if units.insert(id.clone(), address.take()).is_some() {
        return Err(payload_error(&format!("duplicate unit id {id}")));
    }
    Ok(())
}

fn payload_error(reason: &str) -> AssessError {
    AssessError::Payload {
        reason: reason.to_owned(),
    }
}
