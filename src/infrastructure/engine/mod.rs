pub mod geodiff_cli;

pub use geodiff_cli::GeodiffCli;
