//! CLI module for the DTO cost analyzer
//!
//! The binary is a thin shell: argument plumbing around the analysis
//! engine plus JSON report output.

pub mod analyze;

use clap::{Parser, Subcommand};

/// DTO Cost Analyzer - ranks egress spend and correlates it with flow logs
#[derive(Parser)]
#[command(name = "dto-cost-analyzer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze DTO costs for one billing period
    Analyze(analyze::AnalyzeArgs),
}
