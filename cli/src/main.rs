//! SplitLedger menu front end
//!
//! Thin interactive shell over the core: it prompts, parses, and renders.
//! Everything with semantics (splitting, aggregation, simplification,
//! snapshot validation) lives in `splitledger_core`; this binary only turns
//! structured values into text and back.

mod store;

use splitledger_core::{
    simplify, verify_zero_sum, Expense, Group, Ledger, Settlement, SplitSpec, User,
};
use std::io::{self, BufRead, Write};
use std::path::Path;

fn main() {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut ledger = Ledger::new();

    loop {
        println!();
        println!("SplitLedger Menu");
        println!("1. Add User");
        println!("2. Create Group");
        println!("3. Add Expense");
        println!("4. View Debts");
        println!("5. Settle Up");
        println!("6. Save / Load Data");
        println!("7. Exit");

        let choice = match prompt(&mut input, "Enter choice: ") {
            Ok(line) => line,
            Err(_) => break,
        };

        let result = match choice.as_str() {
            "1" => add_user(&mut input, &mut ledger),
            "2" => create_group(&mut input, &mut ledger),
            "3" => add_expense(&mut input, &mut ledger),
            "4" => view_debts(&ledger),
            "5" => settle_up(&mut input, &mut ledger),
            "6" => save_load(&mut input, &mut ledger),
            "7" => {
                println!("Goodbye!");
                break;
            }
            _ => {
                println!("Invalid choice. Try again.");
                Ok(())
            }
        };

        if let Err(message) = result {
            println!("{}", message);
        }
    }
}

/// Print a prompt and read one trimmed line
fn prompt(input: &mut impl BufRead, label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
    }
    Ok(line.trim().to_string())
}

fn ask(input: &mut impl BufRead, label: &str) -> Result<String, String> {
    prompt(input, label).map_err(|e| format!("Input error: {}", e))
}

fn add_user(input: &mut impl BufRead, ledger: &mut Ledger) -> Result<(), String> {
    let name = ask(input, "Enter user name: ")?;
    let email = ask(input, "Enter email: ")?;

    let user = User::new(name, email).map_err(|e| e.to_string())?;
    ledger.add_user(user).map_err(|e| e.to_string())?;
    println!("User added successfully!");
    Ok(())
}

fn create_group(input: &mut impl BufRead, ledger: &mut Ledger) -> Result<(), String> {
    let name = ask(input, "Enter group name: ")?;
    let members = ask(input, "Add member emails (comma separated): ")?
        .split(',')
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect();

    let group = Group::new(name, members).map_err(|e| e.to_string())?;
    ledger.add_group(group).map_err(|e| e.to_string())?;
    println!("Group created successfully!");
    Ok(())
}

fn add_expense(input: &mut impl BufRead, ledger: &mut Ledger) -> Result<(), String> {
    let group_name = ask(input, "Enter group name: ")?;
    let group = ledger
        .get_group(&group_name)
        .ok_or_else(|| "Group not found.".to_string())?
        .clone();

    let description = ask(input, "Enter expense description: ")?;
    let amount = parse_amount(&ask(input, "Enter total amount: ")?)
        .ok_or_else(|| "Invalid amount.".to_string())?;

    let payer = ask(input, "Who paid? (email): ")?.to_lowercase();
    if !group.contains(&payer) {
        return Err("Payer must be a group member.".to_string());
    }

    let raw_participants = ask(
        input,
        "Members involved (emails, comma separated; leave blank = all members): ",
    )?;
    let participants: Vec<String> = if raw_participants.is_empty() {
        group.members().to_vec()
    } else {
        let listed: Vec<String> = raw_participants
            .split(',')
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        for participant in &listed {
            if !group.contains(participant) {
                return Err(format!("{} is not a member of the group.", participant));
            }
        }
        listed
    };

    let split = prompt_split_spec(input)?;
    let expense =
        Expense::new(description, amount, payer, participants, split).map_err(|e| e.to_string())?;
    let strategy = expense.split().strategy_name();
    ledger.record_expense(expense).map_err(|e| e.to_string())?;

    println!("Expense recorded successfully! ({} split)", strategy);
    render_debts(ledger)
}

fn prompt_split_spec(input: &mut impl BufRead) -> Result<SplitSpec, String> {
    let split_type = ask(input, "Split type (equal / exact / percent / shares): ")?.to_lowercase();

    match split_type.as_str() {
        "equal" | "" => Ok(SplitSpec::Equal),
        "exact" | "unequal" => {
            let raw = ask(input, "Amounts per participant (email:amount, comma separated): ")?;
            let amounts = parse_pairs(&raw, parse_amount)?;
            Ok(SplitSpec::Exact { amounts })
        }
        "percent" | "percentage" => {
            let raw = ask(input, "Percents per participant (email:percent, sum 100): ")?;
            let percents_bps = parse_pairs(&raw, parse_percent_bps)?;
            Ok(SplitSpec::Percent { percents_bps })
        }
        "shares" | "ratio" => {
            let raw = ask(input, "Integer shares per participant (email:shares): ")?;
            let weights = parse_pairs(&raw, |v| v.parse::<u32>().ok())?;
            Ok(SplitSpec::Shares { weights })
        }
        other => Err(format!("Unknown split type '{}'", other)),
    }
}

fn view_debts(ledger: &Ledger) -> Result<(), String> {
    render_debts(ledger)
}

fn render_debts(ledger: &Ledger) -> Result<(), String> {
    let balances = ledger.net_balances();
    verify_zero_sum(&balances).map_err(|e| format!("Ledger is corrupt: {}", e))?;

    println!("Net balances:");
    let mut sorted: Vec<_> = balances.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    for (id, balance) in sorted {
        let name = ledger.get_user(id).map(|u| u.name().to_string());
        let label = name.unwrap_or_else(|| id.clone());
        println!("  {}: {}", label, format_amount(*balance));
    }

    let payments = simplify(&balances).map_err(|e| format!("Ledger is corrupt: {}", e))?;
    println!("Suggested settlements:");
    if payments.is_empty() {
        println!("  No outstanding debts.");
    }
    for payment in payments {
        println!(
            "  {} owes {} {}",
            display_name(ledger, &payment.debtor),
            display_name(ledger, &payment.creditor),
            format_amount(payment.amount)
        );
    }
    Ok(())
}

fn display_name(ledger: &Ledger, id: &str) -> String {
    ledger
        .get_user(id)
        .map(|u| u.name().to_string())
        .unwrap_or_else(|| id.to_string())
}

fn settle_up(input: &mut impl BufRead, ledger: &mut Ledger) -> Result<(), String> {
    let payer = ask(input, "Payer email: ")?.to_lowercase();
    let payee = ask(input, "Receiver email: ")?.to_lowercase();
    let amount = parse_amount(&ask(input, "Amount: ")?)
        .ok_or_else(|| "Invalid amount.".to_string())?;

    let settlement = Settlement::new(payer, payee, amount).map_err(|e| e.to_string())?;
    ledger
        .record_settlement(settlement)
        .map_err(|e| e.to_string())?;

    println!("Settlement recorded.");
    render_debts(ledger)
}

fn save_load(input: &mut impl BufRead, ledger: &mut Ledger) -> Result<(), String> {
    let choice = ask(input, "Type 'save' or 'load': ")?.to_lowercase();
    let filename = ask(input, "Filename (e.g., data.json): ")?;
    let path = Path::new(&filename);

    match choice.as_str() {
        "save" => {
            store::save(path, ledger).map_err(|e| format!("Failed to save: {}", e))?;
            println!("Saved to {}", filename);
        }
        "load" => {
            *ledger = store::load(path).map_err(|e| format!("Failed to load: {}", e))?;
            println!("Loaded from {}", filename);
        }
        _ => return Err("Unknown choice.".to_string()),
    }
    Ok(())
}

/// Parse a decimal amount ("12", "12.3", "12.34") into minor units
fn parse_amount(raw: &str) -> Option<i64> {
    parse_fixed_point(raw, 100)
}

/// Parse a percentage ("25", "33.33") into basis points
fn parse_percent_bps(raw: &str) -> Option<u32> {
    parse_fixed_point(raw, 100).and_then(|v| u32::try_from(v).ok())
}

/// Parse a non-negative decimal with at most two fraction digits, scaled
fn parse_fixed_point(raw: &str, scale: i64) -> Option<i64> {
    let raw = raw.trim();
    let (whole, fraction) = match raw.split_once('.') {
        Some((w, f)) => (w, f),
        None => (raw, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().ok().filter(|v| *v >= 0)?
    };
    let fraction_value: i64 = if fraction.is_empty() {
        0
    } else {
        let parsed: i64 = fraction.parse().ok()?;
        // "3" means thirty hundredths, "03" means three
        if fraction.len() == 1 {
            parsed * 10
        } else {
            parsed
        }
    };

    whole.checked_mul(scale)?.checked_add(fraction_value)
}

/// Render minor units as a decimal string
fn format_amount(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let magnitude = amount.unsigned_abs();
    format!("{}{}.{:02}", sign, magnitude / 100, magnitude % 100)
}

/// Parse "email:value,email:value" with a per-value parser
fn parse_pairs<T>(raw: &str, parse_value: impl Fn(&str) -> Option<T>) -> Result<Vec<(String, T)>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|pair| {
            let (email, value) = pair
                .split_once(':')
                .ok_or_else(|| format!("Expected email:value, got '{}'", pair))?;
            let parsed = parse_value(value.trim())
                .ok_or_else(|| format!("Invalid value in '{}'", pair))?;
            Ok((email.trim().to_lowercase(), parsed))
        })
        .collect()
}
