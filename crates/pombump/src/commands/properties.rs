use std::collections::BTreeMap;

use anyhow::Result;
use operator::Operator;

use crate::cli::PropertiesArgs;
use crate::commands::scan;

pub fn run(args: &PropertiesArgs) -> Result<()> {
    let operator = Operator::new();
    let project_model = scan(&operator, &args.pom, args.top_level.as_deref())?
        .with_active_profiles(args.profiles.clone())
        .build();

    // sort for stable output
    let resolved: BTreeMap<String, String> =
        project_model.resolved_properties().into_iter().collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    } else {
        for (name, value) in &resolved {
            println!("{name}={value}");
        }
    }
    Ok(())
}
