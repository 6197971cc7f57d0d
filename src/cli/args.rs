use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/*-------------------------------------------------------------------------------------------------
  Command Line Interface (CLI) Arguments
-------------------------------------------------------------------------------------------------*/

#[derive(Parser, Debug)]
#[command(author, version, about = "Query the AWS IP Ranges.", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Logging verbosity
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Select IP ranges by region, service, network border group, or prefix pattern
    Query(QueryArgs),

    /// List the distinct regions, services, or network border groups
    List(ListArgs),
}

/*--------------------------------------------------------------------------------------
  Query Arguments
--------------------------------------------------------------------------------------*/

#[derive(clap::Args, Debug)]
pub struct QueryArgs {
    /// Include prefixes from these AWS Regions (`all` expands to every region)
    #[arg(short = 'r', long = "region")]
    pub regions: Option<Vec<String>>,

    /// Include prefixes used by these AWS Services (`all` expands to every service)
    #[arg(short = 's', long = "service")]
    pub services: Option<Vec<String>>,

    /// Include prefixes from these Network Border Groups (`all` expands to every group)
    #[arg(short = 'b', long = "border-group")]
    pub network_border_groups: Option<Vec<String>>,

    /// Match prefix CIDR strings against this pattern
    #[arg(short = 'p', long = "prefix")]
    pub prefix_pattern: Option<String>,

    /// How the prefix pattern is matched: prefix, substr, or regex
    #[arg(short = 'm', long = "match", default_value = "prefix")]
    pub match_mode: String,

    /// Only include IPv4 prefixes
    #[arg(short = '4', long, conflicts_with = "only_ipv6")]
    pub only_ipv4: bool,

    /// Only include IPv6 prefixes
    #[arg(short = '6', long)]
    pub only_ipv6: bool,

    /// Save the results to a CSV file
    #[arg(long = "csv")]
    pub csv_file: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/*--------------------------------------------------------------------------------------
  List Arguments
--------------------------------------------------------------------------------------*/

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// What to list
    #[arg(value_enum)]
    pub target: ListTarget,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ListTarget {
    Regions,
    Services,
    BorderGroups,
}

/*--------------------------------------------------------------------------------------
  Output Arguments
--------------------------------------------------------------------------------------*/

#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Output format: text, json, yaml, cidr, iptables, nginx, haproxy, or csv
    #[arg(short = 'f', long, default_value = "text")]
    pub format: String,

    /// Write the rendered output to a file instead of stdout
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}
