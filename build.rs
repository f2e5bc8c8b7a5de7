use chrono::DateTime;
use std::process::Command;

fn git_output(args: &[&str]) -> String {
    Command::new("git")
        .args(args)
        .output()
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

fn commit_date() -> String {
    git_output(&["log", "-1", "--format=%ct"])
        .parse::<i64>()
        .ok()
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    let git_sha = git_output(&["rev-parse", "HEAD"]);

    println!(
        "cargo:rustc-env=APP_VERSION={} (Git SHA: {}, Commit Date: {})",
        env!("CARGO_PKG_VERSION"),
        git_sha,
        commit_date()
    );
}
