use nethealth_common::probing::StatusSource;
use nethealth_core::resolver;

use crate::commands::TargetsArgs;
use crate::controller::{ControllerCli, FileStatusSource};
use crate::nprint;
use crate::terminal::{format, print};

pub async fn targets(args: TargetsArgs) -> anyhow::Result<()> {
    let source: Box<dyn StatusSource> = match (&args.controller, &args.status_file) {
        (Some(program), None) => {
            Box::new(ControllerCli::new(program.clone(), args.model.clone()))
        }
        (None, Some(path)) => Box::new(FileStatusSource::new(path.clone())),
        _ => anyhow::bail!("exactly one of --controller and --status-file is required"),
    };

    print::header("probe targets", args.quiet);

    let snapshot = source.fetch().await?;
    let targets = resolver::resolve(&snapshot)?;
    let groups = format::target_details(&targets);

    for (idx, (group, details)) in groups.iter().enumerate() {
        print::tree_head(idx, group);
        print::as_tree_one_level(details.clone());
        if idx + 1 != groups.len() {
            nprint!();
        }
    }

    Ok(())
}
