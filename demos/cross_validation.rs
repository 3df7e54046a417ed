//! Cross-validate tree depths on a numeric CSV file.
//!
//! The file must hold only numeric columns and a header row, the last column
//! is the label.
//!
//! ```bash
//! cargo run --release --example cross_validation -- data/cancer_clean.csv 4
//! ```
use canopy::{CrossValidator, DataFrame, Execution, Task};
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::time::Instant;

fn load_csv(path: &str) -> Result<DataFrame, Box<dyn Error>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let row = record
            .iter()
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()?;
        rows.push(row);
    }
    Ok(DataFrame::from_rows(rows)?)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err("usage: cross_validation <file.csv> [num_threads]".into());
    }
    let num_threads = match args.get(2) {
        Some(n) => n.parse::<usize>()?,
        None => 4,
    };

    let df = load_csv(&args[1])?;
    println!("Dataset loaded: {} rows, {} columns", df.rows(), df.cols());

    let cv = CrossValidator::new(df, 4, 42, Task::Classification)?;
    let depths: Vec<Option<usize>> = [1, 2, 3, 4, 5, 6, 7, 8, 10, 12, 15, 20].iter().map(|d| Some(*d)).collect();

    let start = Instant::now();
    let sequential = cv.validate_depths(&depths, &args[1], Execution::Sequential)?;
    let sequential_ms = start.elapsed().as_secs_f64() * 1000.0;

    let start = Instant::now();
    let parallel = cv.validate_depths(&depths, &args[1], Execution::FoldParallel { num_threads })?;
    let parallel_ms = start.elapsed().as_secs_f64() * 1000.0;

    println!("max_depth,sequential_ms,parallel_ms,mean_cv_accuracy,std_cv_accuracy,fold_scores");
    for (s, p) in sequential.iter().zip(parallel.iter()) {
        let folds: Vec<String> = p.fold_scores.iter().map(|f| format!("{:.4}", f)).collect();
        println!(
            "{},{:.4},{:.4},{:.4},{:.4},{}",
            p.max_depth.map(|d| d.to_string()).unwrap_or_else(|| "unlimited".to_string()),
            s.elapsed.as_secs_f64() * 1000.0,
            p.elapsed.as_secs_f64() * 1000.0,
            p.mean_accuracy,
            p.std_accuracy,
            folds.join(";")
        );
    }
    println!(
        "Total: sequential {:.2}ms, parallel ({} threads) {:.2}ms",
        sequential_ms, num_threads, parallel_ms
    );

    if let Some(best) = cv.get_best_params(&parallel) {
        println!("Best max_depth: {:?}", best.max_depth);
    }
    Ok(())
}
