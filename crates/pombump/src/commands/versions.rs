use anyhow::Result;
use operator::Operator;

use crate::cli::VersionsArgs;
use crate::commands::scan;

pub fn run(args: &VersionsArgs) -> Result<()> {
    let operator = Operator::new();
    let project_model = scan(&operator, &args.pom, args.top_level.as_deref())?
        .with_active_profiles(args.profiles.clone())
        .build();

    match operator.query_versions(&project_model)? {
        Some(response) => {
            println!("source: {}", response.source);
            println!("target: {}", response.target);
        }
        None => println!("no language-level versions declared"),
    }
    Ok(())
}
