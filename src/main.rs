// src/main.rs

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jsv::validate_file;

/// Java 子集的语法校验器
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// 需要被校验的源文件路径
    #[arg(required = true)]
    file_path: PathBuf,
}

fn main() -> ExitCode {
    // 日志写到 stderr，级别由 RUST_LOG 控制
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 参数错误也按校验失败处理（退出码 1），--help / --version 依然返回 0
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<bool> {
    println!("\nValidating {}...\n", args.file_path.display());
    let validation = validate_file(&args.file_path)?;

    println!("----- Starting Syntax Check -----");
    for confirmation in validation.reductions.iter().filter_map(|r| r.confirmation()) {
        println!("Yes, {}", confirmation);
    }
    println!("----- Parsing Complete -----");

    if validation.is_valid() {
        println!("No syntax errors detected. Code is valid.");
    } else {
        println!("Syntax errors found:");
        for diagnostic in &validation.diagnostics {
            println!("- {}", diagnostic);
        }
    }
    println!("\nValidation complete.");

    Ok(validation.is_valid())
}
