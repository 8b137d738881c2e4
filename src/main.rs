use clap::Parser;
use prdrsnap::{
    Cli, OutputFormatter, OutputMode, PrdrSnap, PrdrSnapError, UserFriendlyError,
};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    // Create PrdrSnap instance
    let mut app = match PrdrSnap::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    if cli.list {
        return handle_list(&mut app);
    }

    if cli.dry_run {
        return handle_dry_run(&mut app, &cli);
    }

    // Execute main conversion workflow
    let picked = cli.picked_indices();
    match app.convert_images(picked.as_deref()) {
        Ok(report) => {
            if report.failed == 0 {
                0 // Success
            } else {
                2 // Success with per-file failures
            }
        }
        Err(e) => {
            app.handle_error(&e);

            // Map error types to appropriate exit codes
            match e {
                PrdrSnapError::Cancelled => 130, // Interrupted (SIGINT)
                PrdrSnapError::Config { .. } => 3,
                PrdrSnapError::InvalidPath { .. } => 4,
                PrdrSnapError::ProfileDirNotFound { .. } => 5,
                PrdrSnapError::NoProfilesFound { .. } => 6,
                PrdrSnapError::Permission { .. } => 7,
                _ => 1, // General error
            }
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "prdrsnap.toml".to_string());

    match PrdrSnap::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  prdrsnap --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!(
                "Failed to generate configuration file: {}",
                e.user_message()
            );
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

/// List PRDR* files in the source directory, one numbered line each, without
/// converting anything.
fn handle_list(app: &mut PrdrSnap) -> i32 {
    let source = match app.resolve_source() {
        Ok(source) => source,
        Err(e) => {
            app.handle_error(&e);
            return 5;
        }
    };

    let profiles = match app.scan_profiles(&source) {
        Ok(profiles) => profiles,
        Err(e) => {
            app.handle_error(&e);
            return 4;
        }
    };

    println!("Source: {}", source.display());
    if profiles.is_empty() {
        println!("No PRDR* files found.");
        return 6;
    }

    for (position, profile) in profiles.iter().enumerate() {
        println!("{:>4}  {}  ({} bytes)", position + 1, profile.filename, profile.size);
    }
    println!("\n{} file(s). Use --pick to convert a subset.", profiles.len());

    0
}

fn handle_dry_run(app: &mut PrdrSnap, cli: &Cli) -> i32 {
    let formatter = app.output_formatter();
    formatter.info("DRY RUN MODE - No files will be written");
    formatter.print_separator();

    let source = match app.resolve_source() {
        Ok(source) => source,
        Err(e) => {
            app.handle_error(&e);
            return 5;
        }
    };

    let profiles = match app.scan_profiles(&source) {
        Ok(profiles) => profiles,
        Err(e) => {
            app.handle_error(&e);
            return 4;
        }
    };

    let config = app.config();
    println!("  Source:       {}", source.display());
    match config.directories.destination_dir {
        Some(ref dest) => println!("  Destination:  {}", dest.display()),
        None => println!("  Destination:  <not set>"),
    }
    println!("  Mode:         {}", config.conversion.mode);
    println!("  Decode check: {}", config.conversion.decode_check);

    let picked = cli.picked_indices();
    let staged: Vec<&str> = match picked {
        Some(ref indices) => indices
            .iter()
            .filter_map(|&i| profiles.get(i).map(|p| p.filename.as_str()))
            .collect(),
        None => profiles.iter().map(|p| p.filename.as_str()).collect(),
    };

    println!("  Would convert {} of {} file(s):", staged.len(), profiles.len());
    for name in &staged {
        println!("    {}", name);
    }

    let formatter = app.output_formatter();
    formatter.print_separator();
    formatter.success("Dry run completed successfully");
    formatter.info("Run without --dry-run to perform the conversion");

    0
}

fn print_startup_error(error: &PrdrSnapError) {
    // Create a basic formatter for startup errors
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use prdrsnap::{Config, OutputFormat};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn cli_for_config(config_path: PathBuf) -> Cli {
        Cli {
            source: None,
            dest: None,
            list: false,
            pick: None,
            copy: false,
            no_decode_check: false,
            config: Some(config_path),
            output_format: OutputFormat::Plain,
            verbose: 0,
            quiet: true,
            dry_run: false,
            generate_config: true,
        }
    }

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = cli_for_config(config_path.clone());
        let exit_code = handle_generate_config(&cli);
        assert_eq!(exit_code, 0);
        assert!(config_path.exists());

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[directories]"));
    }

    #[test]
    fn test_list_with_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.directories.source_dir = Some(temp_dir.path().join("absent"));

        let mut app = PrdrSnap::new_for_test(config, OutputMode::Plain, 0, true);
        let exit_code = handle_list(&mut app);
        assert_eq!(exit_code, 5);
    }

    #[test]
    fn test_list_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.directories.source_dir = Some(temp_dir.path().to_path_buf());

        let mut app = PrdrSnap::new_for_test(config, OutputMode::Plain, 0, true);
        let exit_code = handle_list(&mut app);
        assert_eq!(exit_code, 6);
    }
}
