use anyhow::Result;
use operator::{Dependency, Operator};
use tracing::info;

use crate::cli::BumpArgs;
use crate::commands::scan;

pub fn run(args: &BumpArgs) -> Result<()> {
    let operator = Operator::new();
    let dependency = Dependency::from_coordinate_string(&args.coordinate)?;

    let mut project_model = scan(&operator, &args.pom, args.top_level.as_deref())?
        .with_dependency(dependency)
        .with_use_properties(args.use_properties)
        .with_skip_if_newer(args.skip_if_newer)
        .with_override_if_already_exists(args.override_existing)
        .with_active_profiles(args.profiles.clone())
        .build();

    let handled = operator.modify(&mut project_model)?;
    if !handled {
        println!(
            "nothing to do: {} does not declare {}",
            args.pom.display(),
            args.coordinate
        );
        return Ok(());
    }

    let mut written = 0;
    for id in project_model.document_ids() {
        let document = project_model.document(id);
        if !document.dirty() {
            continue;
        }
        if args.dry_run {
            if let Some(path) = document.path() {
                println!("would update {}", path.display());
            }
        } else {
            document.save()?;
            written += 1;
            if let Some(path) = document.path() {
                info!("updated {}", path.display());
            }
        }
    }

    if args.dry_run {
        println!("dry run, nothing written");
    } else if written == 0 {
        println!("already up to date");
    } else {
        println!("updated {written} file(s)");
    }
    Ok(())
}
