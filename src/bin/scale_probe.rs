use std::collections::HashMap;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use itg_align::{ItgParser, Lexicon, RuleWeights};
use sysinfo::{get_current_pid, ProcessRefreshKind, System};

fn main() {
    let options = Options::parse();

    eprintln!("\n{}", "=".repeat(80));
    eprintln!("ITG Scaling Probe: Performance and Correctness Testing");
    eprintln!("{}", "=".repeat(80));
    eprintln!();
    eprintln!("Biparses synthetic sentence pairs of increasing length and checks:");
    eprintln!(
        "  • Correctness: root scores match a memoised recurrence (up to length {})",
        options.verify_limit
    );
    eprintln!("  • Performance: wall-clock time and memory as the chart grows");
    eprintln!();
    eprintln!("Metrics explained:");
    eprintln!("  • wall_s: Wall-clock time in seconds (lower is better)");
    eprintln!("  • rss_delta_kib: Memory delta in KiB");
    eprintln!("  • status: 'passed' = matches baseline, 'not_checked' = too large to verify");
    eprintln!();
    eprintln!("{}", "=".repeat(80));
    eprintln!();

    let mut sys = System::new();
    let mut measurements = Vec::new();

    eprintln!("[1/2] Full ITG (direct and inverted rules)...");
    measurements.extend(run_scenario("itg", true, &options, &mut sys));
    eprintln!();

    eprintln!("[2/2] Direct rules only...");
    measurements.extend(run_scenario("direct_only", false, &options, &mut sys));
    eprintln!();

    print_summary(&measurements);

    if let Err(err) = options.format.write(&measurements) {
        eprintln!("scale_probe output error: {err}");
        std::process::exit(1);
    }
}

/// Scaling probe for the ITG biparser.
#[derive(Parser, Debug)]
#[command(name = "scale_probe", about = "Times ITG biparsing on synthetic pairs of growing length")]
struct Options {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Longest sentence checked against the memoised baseline.
    #[arg(long, default_value_t = 6)]
    verify_limit: usize,

    /// Longest sentence pair to parse.
    #[arg(long, default_value_t = 24)]
    max_len: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Table,
    Json,
}

impl OutputFormat {
    fn write(self, measurements: &[Measurement]) -> Result<(), String> {
        match self {
            OutputFormat::Csv => write_csv(measurements),
            OutputFormat::Table => write_table(measurements),
            OutputFormat::Json => write_json(measurements),
        }
    }
}

#[derive(Clone)]
struct Measurement {
    scenario: &'static str,
    size_desc: String,
    wall_s: f64,
    rss_delta_kib: u64,
    verification_status: VerificationStatus,
    verification_detail: Option<String>,
}

#[derive(Clone, Copy)]
enum VerificationStatus {
    NotChecked,
    Passed,
    Failed,
}

impl VerificationStatus {
    fn label(&self) -> &'static str {
        match self {
            VerificationStatus::NotChecked => "not_checked",
            VerificationStatus::Passed => "passed",
            VerificationStatus::Failed => "failed",
        }
    }
}

const SIZES: &[usize] = &[2, 3, 4, 6, 8, 12, 16, 20, 24, 32];
const VOCAB: usize = 7;

fn run_scenario(
    scenario: &'static str,
    inverted: bool,
    options: &Options,
    sys: &mut System,
) -> Vec<Measurement> {
    let sizes: Vec<usize> = SIZES
        .iter()
        .copied()
        .filter(|&len| len <= options.max_len)
        .collect();
    let total = sizes.len();
    let lexicon = synthetic_lexicon();

    sizes
        .iter()
        .enumerate()
        .map(|(idx, &len)| {
            eprint!("      [{}/{}] Testing length {}... ", idx + 1, total, len);
            let mut links_result = 0;
            let mut log_score_result = 0.0f64;
            let m = measure(scenario, format!("len={len}"), sys, || {
                let source = synthetic_sentence("s", len, 0);
                let target = synthetic_sentence("t", len, len / 3);
                let mut parser = ItgParser::new(lexicon.clone());
                parser.enable_inverted_rules(inverted);
                let outcome = parser.biparse(&source, &target);
                links_result = outcome.links.len();
                log_score_result = outcome.log_score;

                if len <= options.verify_limit {
                    let baseline = naive_root_log_score(
                        &source,
                        &target,
                        &lexicon,
                        &RuleWeights::default(),
                        inverted,
                    );
                    if baseline == outcome.log_score {
                        (VerificationStatus::Passed, None)
                    } else {
                        (
                            VerificationStatus::Failed,
                            Some(format!("expected {baseline}, got {}", outcome.log_score)),
                        )
                    }
                } else {
                    (VerificationStatus::NotChecked, None)
                }
            });
            let status_icon = match m.verification_status {
                VerificationStatus::Passed => "✓",
                VerificationStatus::Failed => "✗",
                VerificationStatus::NotChecked => "○",
            };
            eprintln!(
                "{} links={}, log_score={:.3}, time={:.3}s, status={}",
                status_icon,
                links_result,
                log_score_result,
                m.wall_s,
                m.verification_status.label()
            );
            m
        })
        .collect()
}

fn print_summary(measurements: &[Measurement]) {
    let failed = measurements
        .iter()
        .filter(|m| matches!(m.verification_status, VerificationStatus::Failed))
        .count();
    let passed = measurements
        .iter()
        .filter(|m| matches!(m.verification_status, VerificationStatus::Passed))
        .count();

    eprintln!("{}", "=".repeat(80));
    eprintln!("Summary: {passed} passed, {failed} failed, {} total", measurements.len());
    eprintln!("{}", "=".repeat(80));

    let mut by_scenario: HashMap<&str, Vec<&Measurement>> = HashMap::new();
    for m in measurements {
        by_scenario.entry(m.scenario).or_default().push(m);
    }
    let mut scenarios: Vec<_> = by_scenario.into_iter().collect();
    scenarios.sort_by_key(|(name, _)| *name);

    for (scenario, ms) in scenarios {
        let min_time = ms.iter().map(|m| m.wall_s).fold(f64::INFINITY, f64::min);
        let max_time = ms.iter().map(|m| m.wall_s).fold(0.0, f64::max);
        let max_mem = ms.iter().map(|m| m.rss_delta_kib).max().unwrap_or(0);

        eprintln!("  {scenario}:");
        eprintln!("    Tests: {}", ms.len());
        eprintln!("    Time: min={min_time:.3}s, max={max_time:.3}s");
        eprintln!("    Memory: max_delta={max_mem} KiB");
        if let (Some(first), Some(last)) = (ms.first(), ms.last()) {
            if ms.len() >= 2 && first.wall_s > 0.0 {
                eprintln!(
                    "    Scaling: {:.1}x slower from {} to {}",
                    last.wall_s / first.wall_s,
                    first.size_desc,
                    last.size_desc
                );
            }
        }
        eprintln!();
    }

    if failed == 0 {
        eprintln!("✓ All verified lengths match the baseline.");
    } else {
        eprintln!("✗ {failed} length(s) disagree with the baseline.");
    }
    eprintln!();
}

fn measure<F>(scenario: &'static str, size_desc: String, sys: &mut System, compute: F) -> Measurement
where
    F: FnOnce() -> (VerificationStatus, Option<String>),
{
    let before = rss_kib(sys);
    let start = Instant::now();
    let (status, detail) = compute();
    let duration = start.elapsed();
    let after = rss_kib(sys);

    Measurement {
        scenario,
        size_desc,
        wall_s: duration.as_secs_f64(),
        rss_delta_kib: after.saturating_sub(before),
        verification_status: status,
        verification_detail: detail,
    }
}

fn write_csv(measurements: &[Measurement]) -> Result<(), String> {
    println!("scenario,size_desc,wall_s,rss_delta_kib,verification_status,verification_detail");
    for m in measurements {
        let detail = m
            .verification_detail
            .as_ref()
            .map(|s| s.replace('"', "'"))
            .unwrap_or_default();
        println!(
            "{},{},{:.3},{},{},\"{}\"",
            m.scenario,
            m.size_desc,
            m.wall_s,
            m.rss_delta_kib,
            m.verification_status.label(),
            detail
        );
    }
    Ok(())
}

fn write_table(measurements: &[Measurement]) -> Result<(), String> {
    let col1 = measurements
        .iter()
        .map(|m| m.scenario.len())
        .fold("scenario".len(), usize::max);
    let col2 = measurements
        .iter()
        .map(|m| m.size_desc.len())
        .fold("size".len(), usize::max);

    println!(
        "{:<col1$}  {:<col2$}  {:>12}  {:>14}  {:>12}  detail",
        "scenario", "size", "wall_s", "rss_delta_kib", "status",
    );
    println!(
        "{:-<col1$}  {:-<col2$}  {:-<12}  {:-<14}  {:-<12}  {:-<12}",
        "", "", "", "", "", "",
    );
    for m in measurements {
        println!(
            "{:<col1$}  {:<col2$}  {:>12.3}  {:>14}  {:>12}  {}",
            m.scenario,
            m.size_desc,
            m.wall_s,
            m.rss_delta_kib,
            m.verification_status.label(),
            m.verification_detail.as_deref().unwrap_or(""),
        );
    }
    Ok(())
}

fn write_json(measurements: &[Measurement]) -> Result<(), String> {
    println!("[");
    for (idx, m) in measurements.iter().enumerate() {
        let detail = m.verification_detail.as_ref().map(|s| s.replace('"', "'"));
        println!(
            "  {{\"scenario\":\"{}\",\"size\":\"{}\",\"wall_s\":{:.3},\"rss_delta_kib\":{},\"verification\":{{\"status\":\"{}\",\"detail\":{}}}}}{}",
            m.scenario,
            m.size_desc,
            m.wall_s,
            m.rss_delta_kib,
            m.verification_status.label(),
            match detail {
                Some(ref d) => format!("\"{d}\""),
                None => "null".to_string(),
            },
            if idx + 1 == measurements.len() { "" } else { "," }
        );
    }
    println!("]");
    Ok(())
}

fn rss_kib(sys: &mut System) -> u64 {
    sys.refresh_processes_specifics(ProcessRefreshKind::new());
    if let Some(process) = get_current_pid().ok().and_then(|pid| sys.process(pid)) {
        process.memory()
    } else {
        0
    }
}

/// Words cycle through a small vocabulary; `offset` rotates the target so
/// that a share of the pairs only line up through inversions.
fn synthetic_sentence(prefix: &str, len: usize, offset: usize) -> Vec<String> {
    (0..len)
        .map(|i| {
            let k = if i % 2 == 0 { i + offset } else { i.wrapping_mul(3) + offset };
            format!("{prefix}{}", k % VOCAB)
        })
        .collect()
}

fn synthetic_lexicon() -> Lexicon {
    let mut lexicon = Lexicon::new();
    for i in 0..VOCAB {
        lexicon.insert(format!("s{i}"), format!("t{i}"), -0.5 - (i as f64) * 0.25);
        lexicon.insert(format!("s{i}"), format!("t{}", (i + 1) % VOCAB), -4.0);
    }
    lexicon
}

type Key = (usize, usize, usize, usize);

/// Top-down memoised form of the span recurrence in log space, keyed by the
/// raw tuple.
fn naive_root_log_score(
    source: &[String],
    target: &[String],
    lexicon: &Lexicon,
    weights: &RuleWeights,
    inverted: bool,
) -> f64 {
    fn delta(
        q: Key,
        source: &[String],
        target: &[String],
        lexicon: &Lexicon,
        weights: &RuleWeights,
        inverted: bool,
        memo: &mut HashMap<Key, f64>,
    ) -> f64 {
        let (s, t, u, v) = q;
        match (t - s, v - u) {
            (1, 1) => {
                let score = lexicon
                    .get(&source[s], &target[u])
                    .filter(|&x| x != 0.0)
                    .unwrap_or(weights.unknown_pair);
                return score;
            }
            (1, 0) => return weights.source_null,
            (0, 1) => return weights.target_null,
            (a, b) if a + b <= 2 => return f64::NEG_INFINITY,
            _ => {}
        }
        if let Some(&known) = memo.get(&q) {
            return known;
        }
        let mut best = f64::NEG_INFINITY;
        for cs in s..=t {
            for cu in u..=v {
                if (cs - s) * (t - cs) + (cu - u) * (v - cu) == 0 {
                    continue;
                }
                let direct = weights.direct
                    + delta((s, cs, u, cu), source, target, lexicon, weights, inverted, memo)
                    + delta((cs, t, cu, v), source, target, lexicon, weights, inverted, memo);
                best = best.max(direct);
                if inverted {
                    let crossed = weights.inverted
                        + delta((s, cs, cu, v), source, target, lexicon, weights, inverted, memo)
                        + delta((cs, t, u, cu), source, target, lexicon, weights, inverted, memo);
                    best = best.max(crossed);
                }
            }
        }
        memo.insert(q, best);
        best
    }

    let mut memo = HashMap::new();
    delta(
        (0, source.len(), 0, target.len()),
        source,
        target,
        lexicon,
        weights,
        inverted,
        &mut memo,
    )
}
