//! cpu-sched CLI
//!
//! Runs one scheduling algorithm over a process set and prints the Gantt
//! chart and the per-process completion table.

use clap::Parser;
use serde::Serialize;
use std::{fs, path::PathBuf, process::ExitCode};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cpu_sched::{
    Algorithm, Process, Schedule, SchedEvent, SimRequest, Summary, simulate_traced,
    sim::workload::{self, BernoulliParams},
};

#[derive(Parser, Debug)]
#[command(name = "cpu-sched")]
#[command(about = "Simulate CPU scheduling: FCFS, SJF, Priority and Round Robin", long_about = None)]
struct Args {
    /// Scheduling algorithm (fcfs, sjf, priority, rr)
    #[arg(short, long, default_value = "fcfs")]
    algorithm: Algorithm,

    /// Time quantum for Round Robin
    #[arg(short, long, default_value_t = 2)]
    quantum: i64,

    /// JSON file with an array of processes
    /// (`[{"id": "P1", "burst_time": 6, "arrival_time": 2, "priority": 3}, ...]`)
    #[arg(short, long, conflicts_with = "random")]
    input: Option<PathBuf>,

    /// Generate a random workload over this many ticks instead of the demo set
    #[arg(long)]
    random: Option<u64>,

    /// Seed for --random
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Print every scheduling event
    #[arg(long)]
    trace: bool,

    /// Write the schedule and summary as JSON to this path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct Report<'a> {
    algorithm: Algorithm,
    quantum: Option<i64>,
    gantt: Vec<String>,
    #[serde(flatten)]
    schedule: &'a Schedule,
    summary: Summary,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> cpu_sched::Result<()> {
    let processes = load_processes(&args)?;

    let mut request = SimRequest::new(processes, args.algorithm);
    if args.algorithm.needs_quantum() {
        request = request.with_quantum(args.quantum);
    }

    print_processes(&request);

    let trace = args.trace;
    let schedule = simulate_traced(&request, |event| {
        if trace {
            print_event(event);
        }
    })?;
    let summary = schedule.summary();

    println!("\nGantt chart ({}):", args.algorithm);
    println!("  {}", schedule.timeline);
    for span in schedule.timeline.spans() {
        println!("  {:>4} - {:<4} {}", span.start, span.end, span.label());
    }

    println!();
    println!(
        "{:<10} {:>10} {:>10} {:>12} {:>12} {:>10}",
        "Process", "Arrival", "Burst", "Completion", "Turnaround", "Waiting"
    );
    println!("{}", "-".repeat(69));
    for record in schedule.completions.iter() {
        println!(
            "{:<10} {:>10} {:>10} {:>12} {:>12} {:>10}",
            record.id,
            record.arrival_time,
            record.burst_time,
            record.completion_time,
            record.turnaround_time,
            record.waiting_time
        );
    }

    println!();
    println!("Average turnaround time: {:.2} ticks", summary.average_turnaround);
    println!("Average waiting time: {:.2} ticks", summary.average_waiting);
    println!("Average response time: {:.2} ticks", summary.average_response);
    println!(
        "Makespan: {} ticks ({} idle, {:.1}% utilization, {} context switches, {} preemptions)",
        summary.makespan,
        summary.idle_ticks,
        summary.utilization * 100.0,
        summary.context_switches,
        summary.preemptions
    );

    if let Some(path) = args.output {
        let report = Report {
            algorithm: args.algorithm,
            quantum: request.quantum,
            gantt: schedule.gantt(),
            schedule: &schedule,
            summary,
        };
        fs::write(&path, serde_json::to_string_pretty(&report)?)?;
        info!(path = %path.display(), "results saved");
    }

    Ok(())
}

fn load_processes(args: &Args) -> cpu_sched::Result<Vec<Process>> {
    if let Some(path) = &args.input {
        let raw = fs::read_to_string(path)?;
        let mut processes: Vec<Process> = serde_json::from_str(&raw)?;
        info!(path = %path.display(), count = processes.len(), "loaded processes");

        if args.algorithm.needs_priority() {
            for p in processes.iter_mut().filter(|p| p.priority.is_none()) {
                p.priority = Some(workload::DEFAULT_PRIORITY);
            }
        }
        return Ok(processes);
    }

    if let Some(ticks) = args.random {
        let params = BernoulliParams {
            ticks,
            ..BernoulliParams::default()
        };
        return Ok(workload::bernoulli_processes(params, args.seed));
    }

    Ok(workload::demo_processes())
}

fn print_processes(request: &SimRequest) {
    let show_priority = request.algorithm.needs_priority();

    println!("Processes:");
    print!("{:<10} {:>10} {:>10}", "Process", "Burst", "Arrival");
    if show_priority {
        print!(" {:>10}", "Priority");
    }
    println!();

    for p in &request.processes {
        print!("{:<10} {:>10} {:>10}", p.id, p.burst_time, p.arrival_time);
        if show_priority {
            match p.priority {
                Some(priority) => print!(" {priority:>10}"),
                None => print!(" {:>10}", "-"),
            }
        }
        println!();
    }
}

fn print_event(event: &SchedEvent) {
    match event {
        SchedEvent::Arrived { process, at } => println!("t={at} {process} arrived"),
        SchedEvent::Dispatched { process, at, run } => {
            println!("t={at} {process} runs for {run}")
        }
        SchedEvent::Preempted {
            process,
            at,
            remaining,
        } => println!("t={at} {process} preempted, {remaining} left"),
        SchedEvent::Finished { process, at } => println!("t={at} {process} finished"),
        SchedEvent::Idle { at } => println!("t={at} idle"),
    }
}
