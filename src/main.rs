//! splitledger CLI
//!
//! Compute balances and settle-up payments from a ledger snapshot.
//!
//! # Usage
//!
//! ```bash
//! # Net balance of every participant
//! splitledger balances --input ledger.json
//!
//! # Simplified repayments for one group, as JSON
//! splitledger settle --input ledger.json --group trip --format json
//!
//! # Try out a split
//! splitledger split --total 100 --policy shares --participants ana,ben --weights 1,3
//!
//! # Generate a random ledger for testing
//! splitledger generate --participants 8 --expenses 40
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use rust_decimal::Decimal;
use splitledger::allocation::split::{SplitAllocator, SplitPolicy};
use splitledger::core::group::GroupId;
use splitledger::core::participant::ParticipantId;
use splitledger::engine::{LedgerSnapshot, SettlementEngine, SettlementReport};
use splitledger::simulation::stress_test::{generate_random_scenario, ScenarioConfig};
use splitledger::{EngineError, Result};
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"splitledger — shared-expense balances and debt settlement

USAGE:
    splitledger <COMMAND> [OPTIONS]

COMMANDS:
    balances    Show the net balance of every participant
    settle      Show the simplified list of repayments
    split       Allocate an amount under a split policy
    generate    Generate a random ledger snapshot (for testing)
    help        Show this message

OPTIONS (balances, settle):
    --input <FILE>      Path to JSON ledger snapshot
    --group <ID>        Restrict to one group (applies its pairings)
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (split):
    --total <AMOUNT>        Amount to split
    --policy <POLICY>       equal (default), exact, percent or shares
    --participants <LIST>   Comma-separated participant IDs
    --weights <LIST>        Comma-separated weights, one per participant

OPTIONS (generate):
    --participants <N>  Number of participants (default: 10)
    --expenses <N>      Number of expenses (default: 30)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    splitledger balances --input ledger.json
    splitledger settle --input ledger.json --group trip --format json
    splitledger split --total 90 --participants ana,ben,cleo
    splitledger split --total 100 --policy percent --participants ana,ben --weights 70,30
    splitledger generate --participants 5 --expenses 20 --output test.json"#
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

/// Options shared by `balances` and `settle`.
struct ReportArgs {
    input: String,
    group: Option<GroupId>,
    format: Format,
}

/// Value following a flag, or an error naming the flag.
fn flag_value(args: &[String], i: usize, flag: &str, expects: &str) -> Result<String> {
    args.get(i)
        .cloned()
        .ok_or_else(|| EngineError::InvalidArgument(format!("{} requires {}", flag, expects)))
}

fn parse_report_args(args: &[String]) -> Result<ReportArgs> {
    let mut input = None;
    let mut group = None;
    let mut format = Format::Text;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input = Some(flag_value(args, i, "--input", "a file path")?);
            }
            "--group" => {
                i += 1;
                group = Some(GroupId::new(flag_value(args, i, "--group", "a group ID")?));
            }
            "--format" => {
                i += 1;
                format = match flag_value(args, i, "--format", "'text' or 'json'")?.as_str() {
                    "text" => Format::Text,
                    "json" => Format::Json,
                    other => {
                        return Err(EngineError::InvalidArgument(format!(
                            "unknown format '{}'",
                            other
                        )))
                    }
                };
            }
            other => {
                return Err(EngineError::InvalidArgument(format!(
                    "unknown option: {}",
                    other
                )))
            }
        }
        i += 1;
    }

    let input = input
        .ok_or_else(|| EngineError::InvalidArgument("--input <FILE> is required".to_string()))?;
    Ok(ReportArgs {
        input,
        group,
        format,
    })
}

fn load_report(args: &ReportArgs) -> Result<(LedgerSnapshot, SettlementReport)> {
    let content = fs::read_to_string(&args.input)?;
    let snapshot = LedgerSnapshot::from_json(&content)?;
    let report = SettlementEngine::compute(&snapshot, args.group.as_ref())?;
    Ok((snapshot, report))
}

fn cmd_balances(args: &[String]) -> Result<()> {
    let args = parse_report_args(args)?;
    let (snapshot, report) = load_report(&args)?;

    if args.format == Format::Json {
        println!("{}", serde_json::to_string_pretty(&report.balances)?);
        return Ok(());
    }

    for (id, balance) in report.balances.iter() {
        let status = if balance > Decimal::ZERO {
            "is owed"
        } else if balance < Decimal::ZERO {
            "owes"
        } else {
            "settled"
        };
        println!(
            "  {:<20} {:>12}  {}",
            snapshot.display_name(id),
            balance,
            status
        );
    }
    if report.entity_balances != report.balances {
        println!("\nAfter pairing:");
        for (id, balance) in report.entity_balances.iter() {
            println!("  {:<20} {:>12}", snapshot.display_name(id), balance);
        }
    }
    Ok(())
}

fn cmd_settle(args: &[String]) -> Result<()> {
    let args = parse_report_args(args)?;
    let (snapshot, report) = load_report(&args)?;

    if args.format == Format::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.debts.is_empty() {
        println!("All settled up.");
    } else {
        for debt in &report.debts {
            println!(
                "  {} pays {} {}",
                snapshot.display_name(&debt.from),
                snapshot.display_name(&debt.to),
                debt.amount
            );
        }
    }
    println!();
    print!("{}", report.plan);
    Ok(())
}

fn parse_decimal_list(flag: &str, list: &str) -> Result<Vec<Decimal>> {
    list.split(',')
        .map(|s| {
            s.trim().parse::<Decimal>().map_err(|e| {
                EngineError::InvalidArgument(format!("{}: invalid number '{}': {}", flag, s, e))
            })
        })
        .collect()
}

fn cmd_split(args: &[String]) -> Result<()> {
    let mut total = None;
    let mut policy = SplitPolicy::Equal;
    let mut participants: Vec<ParticipantId> = Vec::new();
    let mut weights = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--total" => {
                i += 1;
                let value = flag_value(args, i, "--total", "an amount")?;
                total = Some(value.parse::<Decimal>().map_err(|e| {
                    EngineError::InvalidArgument(format!("invalid amount '{}': {}", value, e))
                })?);
            }
            "--policy" => {
                i += 1;
                policy = flag_value(args, i, "--policy", "a split policy")?.parse()?;
            }
            "--participants" => {
                i += 1;
                participants = flag_value(args, i, "--participants", "a comma-separated list")?
                    .split(',')
                    .map(|s| ParticipantId::new(s.trim()))
                    .collect();
            }
            "--weights" => {
                i += 1;
                let list = flag_value(args, i, "--weights", "a comma-separated list")?;
                weights = Some(parse_decimal_list("--weights", &list)?);
            }
            other => {
                return Err(EngineError::InvalidArgument(format!(
                    "unknown option: {}",
                    other
                )))
            }
        }
        i += 1;
    }

    let total = total
        .ok_or_else(|| EngineError::InvalidArgument("--total <AMOUNT> is required".to_string()))?;
    if participants.is_empty() {
        return Err(EngineError::InvalidArgument(
            "--participants <LIST> is required".to_string(),
        ));
    }

    let allocations = SplitAllocator::allocate(total, policy, &participants, weights.as_deref());
    if allocations.is_empty() {
        return Err(EngineError::InvalidArgument(format!(
            "cannot allocate {} as a {} split: {}",
            total,
            policy,
            split_rejection(policy, participants.len(), weights.as_deref())
        )));
    }

    for allocation in &allocations {
        println!("  {:<20} {:>12}", allocation.participant, allocation.amount);
    }
    let allocated = allocations
        .iter()
        .try_fold(Decimal::ZERO, |sum, a| sum.checked_add(a.amount));
    match allocated {
        Some(allocated) => {
            println!("\n  {:<20} {:>12}", "allocated", allocated);
            if let Some(drift) = total.checked_sub(allocated).filter(|d| !d.is_zero()) {
                println!("  {:<20} {:>12}", "rounding drift", drift);
            }
        }
        None => println!("\n  {:<20} {:>12}", "allocated", "out of range"),
    }
    Ok(())
}

/// Why the allocator returned nothing for this input.
fn split_rejection(
    policy: SplitPolicy,
    participants: usize,
    weights: Option<&[Decimal]>,
) -> String {
    match weights {
        _ if policy == SplitPolicy::Equal => "amount out of range".to_string(),
        None => format!("needs --weights with one weight per participant ({})", participants),
        Some(w) if w.len() != participants => format!(
            "got {} weights for {} participants",
            w.len(),
            participants
        ),
        Some(w) if policy == SplitPolicy::Shares && sums_to_zero(w) => {
            "shares must not sum to zero".to_string()
        }
        Some(_) => "weights or amount out of range".to_string(),
    }
}

fn sums_to_zero(weights: &[Decimal]) -> bool {
    weights
        .iter()
        .try_fold(Decimal::ZERO, |sum, w| sum.checked_add(*w))
        .map_or(false, |sum| sum.is_zero())
}

fn cmd_generate(args: &[String]) -> Result<()> {
    let mut config = ScenarioConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--participants" => {
                i += 1;
                config.participant_count = flag_value(args, i, "--participants", "a number")?
                    .parse()
                    .map_err(|_| {
                        EngineError::InvalidArgument("--participants requires a number".to_string())
                    })?;
            }
            "--expenses" => {
                i += 1;
                config.expense_count = flag_value(args, i, "--expenses", "a number")?
                    .parse()
                    .map_err(|_| {
                        EngineError::InvalidArgument("--expenses requires a number".to_string())
                    })?;
            }
            "--output" => {
                i += 1;
                output_path = Some(flag_value(args, i, "--output", "a file path")?);
            }
            other => {
                return Err(EngineError::InvalidArgument(format!(
                    "unknown option: {}",
                    other
                )))
            }
        }
        i += 1;
    }

    let snapshot = generate_random_scenario(&config);
    let json = snapshot.to_json()?;

    if let Some(path) = output_path {
        fs::write(&path, &json)?;
        eprintln!(
            "Generated {} expenses across {} participants → {}",
            snapshot.expenses.len(),
            snapshot.participants.len(),
            path
        );
    } else {
        println!("{}", json);
    }
    Ok(())
}

fn run(args: &[String]) -> Result<()> {
    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "balances" => cmd_balances(rest),
        "settle" => cmd_settle(rest),
        "split" => cmd_split(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        _ => {
            print_usage();
            Err(EngineError::InvalidArgument(format!(
                "unknown command: {}",
                command
            )))
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
