use crate::cli;
use awsiprules::{format, IpRange, MatchMode, QueryBuilder, RenderData, Result};
use log::info;
use std::collections::BTreeSet;
use std::rc::Rc;

/*-------------------------------------------------------------------------------------------------
  Core Functions
-------------------------------------------------------------------------------------------------*/

pub fn run(args: &cli::Args) -> Result<()> {
    match &args.command {
        cli::Command::Query(query_args) => run_query(query_args),
        cli::Command::List(list_args) => run_list(list_args),
    }
}

/*--------------------------------------------------------------------------------------
  Query Command
--------------------------------------------------------------------------------------*/

fn run_query(args: &cli::QueryArgs) -> Result<()> {
    // Resolve the formatter and match mode up front so a bad argument fails before any
    // network work.
    let formatter = format::lookup(&args.output.format)?;
    let match_mode: MatchMode = args.match_mode.parse()?;

    let ip_ranges = awsiprules::get_ranges()?;

    let regions = expand_selection(args.regions.as_deref(), ip_ranges.regions());
    let services = expand_selection(args.services.as_deref(), ip_ranges.services());
    let network_border_groups = expand_selection(
        args.network_border_groups.as_deref(),
        ip_ranges.network_border_groups(),
    );

    // Cross product of the selections; each combination is one query against the snapshot.
    let mut ranges: Vec<IpRange> = Vec::new();
    for region in &regions {
        for service in &services {
            for network_border_group in &network_border_groups {
                let query = QueryBuilder::new()
                    .region(region)
                    .service(service)
                    .network_border_group(network_border_group)
                    .prefix_pattern(args.prefix_pattern.as_deref().unwrap_or(""))
                    .match_mode(match_mode)
                    .build()?;

                let result = ip_ranges.query(&query);
                if !args.only_ipv6 {
                    ranges.extend(result.ipv4().iter().cloned());
                }
                if !args.only_ipv4 {
                    ranges.extend(result.ipv6().iter().cloned());
                }
            }
        }
    }

    info!("Query matched {} range(s)", ranges.len());

    if let Some(csv_file) = &args.csv_file {
        cli::csv::save(&ranges, csv_file)?;
    }

    let rendered = formatter.render(&RenderData::Ranges(ranges))?;
    cli::output::write(&rendered, args.output.output.as_deref())
}

/// Expand a criterion's CLI values: absent means the `*` wildcard, a literal `all` expands to
/// the full distinct-value set collected from the snapshot.
fn expand_selection(values: Option<&[String]>, known: &BTreeSet<Rc<str>>) -> Vec<String> {
    match values {
        None => vec!["*".to_string()],
        Some(values) if values.iter().any(|value| value == "all") => {
            known.iter().map(|value| value.to_string()).collect()
        }
        Some(values) => values.to_vec(),
    }
}

/*--------------------------------------------------------------------------------------
  List Command
--------------------------------------------------------------------------------------*/

fn run_list(args: &cli::ListArgs) -> Result<()> {
    let formatter = format::lookup(&args.output.format)?;

    let ip_ranges = awsiprules::get_ranges()?;

    let values = match args.target {
        cli::ListTarget::Regions => ip_ranges.regions(),
        cli::ListTarget::Services => ip_ranges.services(),
        cli::ListTarget::BorderGroups => ip_ranges.network_border_groups(),
    };
    let values: Vec<String> = values.iter().map(|value| value.to_string()).collect();

    let rendered = formatter.render(&RenderData::Strings(values))?;
    cli::output::write(&rendered, args.output.output.as_deref())
}
