//! Interactive induction checking over integer sequences.
//!
//! Drives the `indukt` library from a small text menu: pick or enter a pair
//! of formulas, check the base case and the induction step, then render both
//! sequences as a text chart over an adjustable range.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use indukt::{
    catalog::Catalog,
    check,
    expr::EvalError,
    formula::{Formula, GUIDE, PREDEFINED},
    prelude::{Idx, Int, Res, Signed, ToPrimitive},
    sample::{self, Sample},
};

#[derive(Parser)]
#[clap(
    name = "indukt",
    about = "Checks a simple inductive relation between two integer sequences",
    version = env!("CARGO_PKG_VERSION")
)]
struct Args {
    /// Path to the formula catalog.
    #[clap(long, default_value = "formulas.json", value_name = "FILE")]
    catalog: PathBuf,

    /// Width of the chart bars, in columns.
    #[clap(long, default_value_t = 40, value_name = "COLS")]
    width: usize,
}

fn main() {
    // Use RUST_LOG to control log levels, e.g. RUST_LOG=indukt=debug.
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).without_time())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        for (idx, err) in e.iter().enumerate() {
            let pref = if idx == 0 { "error: " } else { "  caused by: " };
            eprintln!("{}{}", pref, err);
        }
        std::process::exit(2)
    }
}

/// Menu loop. Returns on exit or end of input.
fn run(args: &Args) -> Res<()> {
    let catalog = Catalog::new(&args.catalog);
    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    loop {
        println!();
        println!("Options:");
        println!("  1. enter a new formula");
        println!("  2. load a saved formula");
        println!("  3. select a predefined formula");
        println!("  4. guided mode");
        println!("  5. exit");

        let choice = match prompt(&mut input, "Choose an option: ")? {
            Some(choice) => choice,
            None => break,
        };

        let pair = match choice.as_str() {
            "1" => new_formulas(&mut input, &catalog)?,
            "2" => load_formulas(&mut input, &catalog)?,
            "3" => select_predefined(&mut input)?,
            "4" => {
                guided(&mut input, args)?;
                continue;
            }
            "5" => break,
            _ => {
                println!("Invalid option, please try again.");
                continue;
            }
        };

        if let Some((base, induction)) = pair {
            verify_and_render(&mut input, args, &base, &induction)?;
        }
    }

    Ok(())
}

/// Prompts for a pair of formulas, with an optional save to the catalog.
fn new_formulas(input: &mut impl BufRead, catalog: &Catalog) -> Res<Option<(Formula, Formula)>> {
    println!("Enter the formula for the base case (e.g. `n * (n + 1) / 2`).");
    let base = match prompt_formula(input, "Base case formula: ")? {
        Some(f) => f,
        None => return Ok(None),
    };

    println!("Enter the formula for the induction step (often the same formula).");
    let induction = match prompt_formula(input, "Induction step formula: ")? {
        Some(f) => f,
        None => return Ok(None),
    };

    if let Some(answer) = prompt(input, "Save these formulas? (yes/no) ")? {
        if answer.eq_ignore_ascii_case("yes") || answer.eq_ignore_ascii_case("y") {
            if let Some(name) = prompt(input, "Name for the formulas: ")? {
                if name.is_empty() {
                    println!("Empty name, not saving.");
                } else {
                    catalog.save(&format!("{}_base", name), base.source())?;
                    catalog.save(&format!("{}_induction", name), induction.source())?;
                    println!("Saved to {}.", catalog.path().display());
                }
            }
        }
    }

    Ok(Some((base, induction)))
}

/// Loads a pair of formulas saved by [`new_formulas`].
fn load_formulas(input: &mut impl BufRead, catalog: &Catalog) -> Res<Option<(Formula, Formula)>> {
    let name = match prompt(input, "Name of the formulas to load: ")? {
        Some(name) => name,
        None => return Ok(None),
    };

    let base = catalog.load(&format!("{}_base", name))?;
    let induction = catalog.load(&format!("{}_induction", name))?;
    let (base, induction) = match (base, induction) {
        (Some(base), Some(induction)) => (base, induction),
        _ => {
            println!("Formulas not found.");
            let names = catalog.names()?;
            if !names.is_empty() {
                println!("Saved entries: {}", names.join(", "));
            }
            return Ok(None);
        }
    };

    // Catalog entries are opaque text; they still go through the compiler.
    let base = match Formula::compile(&base) {
        Ok(f) => f,
        Err(e) => {
            println!("Saved base formula no longer compiles:\n{}", e.pretty());
            return Ok(None);
        }
    };
    let induction = match Formula::compile(&induction) {
        Ok(f) => f,
        Err(e) => {
            println!("Saved induction formula no longer compiles:\n{}", e.pretty());
            return Ok(None);
        }
    };

    Ok(Some((base, induction)))
}

/// Selects one of the predefined formulas, used for base and induction alike.
fn select_predefined(input: &mut impl BufRead) -> Res<Option<(Formula, Formula)>> {
    println!("Select a predefined formula:");
    for (idx, (name, src)) in PREDEFINED.iter().enumerate() {
        println!("  {}. {} ({})", idx + 1, name, src);
    }

    let choice = match prompt_idx(input, "Enter your choice: ")? {
        Some(choice) => choice,
        None => return Ok(None),
    };
    let (_, src) = match choice.checked_sub(1).and_then(|idx| PREDEFINED.get(idx)) {
        Some(entry) => entry,
        None => {
            println!("Invalid choice.");
            return Ok(None);
        }
    };

    let formula = Formula::compile(src)?;
    Ok(Some((formula.clone(), formula)))
}

/// Guided mode: syntax guide, formula selection, then the usual checks.
fn guided(input: &mut impl BufRead, args: &Args) -> Res<()> {
    println!();
    println!("{}", GUIDE);
    println!();
    println!("  1. select a predefined formula");
    println!("  2. enter a custom formula");

    let pair = match prompt(input, "Choose an option: ")?.as_deref() {
        Some("1") => select_predefined(input)?,
        Some("2") => {
            let base = prompt_formula(input, "Base case formula: ")?;
            let induction = prompt_formula(input, "Induction step formula: ")?;
            match (base, induction) {
                (Some(base), Some(induction)) => Some((base, induction)),
                _ => None,
            }
        }
        Some(_) => {
            println!("Invalid choice.");
            None
        }
        None => None,
    };

    if let Some((base, induction)) = pair {
        verify_and_render(input, args, &base, &induction)?;
    }
    Ok(())
}

/// Runs the base/step checks, reports, then drives the chart loop.
fn verify_and_render(
    input: &mut impl BufRead,
    args: &Args,
    base: &Formula,
    induction: &Formula,
) -> Res<()> {
    let base_n = match prompt_idx(input, "Value of n for the base case (e.g. 1): ")? {
        Some(n) => n,
        None => return Ok(()),
    };
    let k = match prompt_idx(input, "Value of k for the induction step (e.g. 5): ")? {
        Some(k) => k,
        None => return Ok(()),
    };

    let verif = check::verify(base, induction, base_n, k);

    match &verif.base_value {
        Ok(value) => println!("Base case at n = {}: {}", base_n, value),
        Err(e) => {
            println!("Base case failed at n = {}: {}", base_n, e);
            return Ok(());
        }
    }

    match &verif.step {
        Some(Ok(res)) if res.holds() => {
            println!(
                "Induction step holds at k = {}: {} = {} + {}",
                k,
                res.actual,
                &res.expected - Int::from(k + 1),
                k + 1,
            );
        }
        Some(Ok(res)) => {
            let hypothesis = &res.expected - Int::from(k + 1);
            println!("Induction step fails at k = {}, breakdown:", k);
            println!("  hypothesis at k = {}: {}", k, hypothesis);
            println!("  expected at k + 1 = {}: {} + {} = {}", k + 1, hypothesis, k + 1, res.expected);
            println!("  actual at k + 1 = {}: {}", k + 1, res.actual);
        }
        Some(Err(e)) => {
            println!("Induction step could not be checked: {}", e);
        }
        None => (),
    }

    let mut max_n = match prompt_idx(input, "Maximum n for visualization (e.g. 10): ")? {
        Some(n) => n.max(1),
        None => return Ok(()),
    };

    loop {
        let base_sample = sample::sample(base, 1, max_n)?;
        let induction_sample = sample::sample(induction, 1, max_n)?;
        render(base, induction, &base_sample, &induction_sample, args.width);

        // The range is the one moving part: a new bound means re-sample and
        // re-render.
        match prompt(input, "New maximum n (empty to go back): ")? {
            None => return Ok(()),
            Some(answer) if answer.is_empty() => return Ok(()),
            Some(answer) => match answer.parse::<Idx>() {
                Ok(n) => max_n = n.max(1),
                Err(_) => println!("Expected a natural number, got `{}`.", answer),
            },
        }
    }
}

/// Renders two samples side by side as horizontal bars.
fn render(base: &Formula, induction: &Formula, lft: &Sample, rgt: &Sample, width: usize) {
    let width = width.max(1);
    println!();
    println!("base:      {}", base);
    println!("induction: {}", induction);
    println!();

    let scale = chart_scale(&[lft, rgt]);
    println!("{: >4} | {: <w$} | {}", "n", "base", "induction", w = width + 12);
    for ((idx, b), (_, i)) in lft.points().iter().zip(rgt.points()) {
        println!(
            "{: >4} | {: <w$} | {}",
            idx,
            cell(b, scale, width),
            cell(i, scale, width),
            w = width + 12,
        );
    }
}

/// Largest absolute successful value over some samples, for bar scaling.
fn chart_scale(samples: &[&Sample]) -> f64 {
    let mut max = 0f64;
    for sample in samples {
        for (_, res) in sample.points() {
            if let Ok(value) = res {
                let abs = value.abs().to_f64().unwrap_or(f64::MAX);
                if abs > max {
                    max = abs;
                }
            }
        }
    }
    max
}

/// One chart cell: a scaled bar and the value, or a marked error.
///
/// Failed indices render distinctly (leading `!`), they are never dropped.
fn cell(res: &Result<Int, EvalError>, scale: f64, width: usize) -> String {
    match res {
        Ok(value) => {
            let len = if scale > 0f64 {
                let ratio = value.abs().to_f64().unwrap_or(f64::MAX) / scale;
                (ratio * width as f64).ceil() as usize
            } else {
                0
            };
            let glyph = if value.is_negative() { "-" } else { "#" };
            format!("{} {}", glyph.repeat(len.min(width)), value)
        }
        Err(e) => format!("!{}", e),
    }
}

/// Prompts for one trimmed line, `None` on end of input.
fn prompt(input: &mut impl BufRead, msg: &str) -> Res<Option<String>> {
    print!("{}", msg);
    std::io::stdout().flush()?;
    let mut line = String::new();
    let read = input.read_line(&mut line)?;
    if read == 0 {
        println!();
        Ok(None)
    } else {
        Ok(Some(line.trim().to_string()))
    }
}

/// Prompts for a natural number, re-prompting on unparseable input.
fn prompt_idx(input: &mut impl BufRead, msg: &str) -> Res<Option<Idx>> {
    loop {
        match prompt(input, msg)? {
            None => return Ok(None),
            Some(answer) => match answer.parse::<Idx>() {
                Ok(idx) => return Ok(Some(idx)),
                Err(_) => println!("Expected a natural number, got `{}`.", answer),
            },
        }
    }
}

/// Prompts for a formula, re-prompting with a pretty error on bad input.
fn prompt_formula(input: &mut impl BufRead, msg: &str) -> Res<Option<Formula>> {
    loop {
        match prompt(input, msg)? {
            None => return Ok(None),
            Some(src) => match Formula::compile(&src) {
                Ok(formula) => return Ok(Some(formula)),
                Err(e) => println!("{}", e.pretty()),
            },
        }
    }
}
