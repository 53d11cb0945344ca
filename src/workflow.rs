use crate::agents::{ProjectScannerAgent, UPDATE_BRANCH, UpdateResolver, VersionControlAgent};
use crate::config::Config;
use crate::error::Result;
use crate::github::GithubClient;
use crate::gradle::BuildFilePatcher;
use crate::remote::RemoteFactory;
use crate::report::ChangeSet;
use crate::store::{Lookup, VendorDepStore};
use colored::Colorize;
use std::path::Path;

/// Execute the update workflow
pub fn execute_update<P: AsRef<Path>>(project_path: P, no_git: bool, no_pr: bool) -> Result<()> {
    let project_path = project_path.as_ref();
    let config = Config::from_env();
    println!("{}", "Starting vendordep update process...".cyan().bold());

    // Step 1: Validate project structure
    println!("\n{}", "1. Validating project structure...".yellow());
    let scanner = ProjectScannerAgent::new(project_path);
    let project_info = scanner.validate()?;
    println!(
        "{}",
        format!("✓ Project structure is valid (year {})", project_info.project_year).green()
    );

    // Step 2: Git checks and update branch
    let git_agent = if project_info.has_git && !no_git {
        println!("\n{}", "2. Preparing Git update branch...".yellow());
        // The git agent only accepts absolute paths.
        let agent = VersionControlAgent::new(std::fs::canonicalize(project_path)?)?;

        if !agent.is_working_directory_clean()? {
            println!(
                "{}",
                "⚠ Warning: Working directory has uncommitted changes".red()
            );
            println!("Please commit or stash your changes before proceeding.");
            return Ok(());
        }

        let branch = agent.prepare_update_branch()?;
        println!("{}", format!("✓ On branch: {}", branch).green());
        Some(agent)
    } else {
        if !no_git {
            println!(
                "\n{}",
                "2. Git repository not detected, skipping Git steps".yellow()
            );
        }
        None
    };

    // Step 3: Resolve and apply updates
    println!("\n{}", "3. Checking for updates...".yellow());
    let resolver = UpdateResolver::new(
        RemoteFactory::create_marketplace()?,
        RemoteFactory::create_releases(&config)?,
    );
    let patcher = BuildFilePatcher::new(&project_info.build_gradle_path);
    let store = VendorDepStore::new(&project_info.vendordeps_dir);

    let mut changes = ChangeSet::new();
    println!("   {}", "Checking WPILib...".cyan());
    resolver.update_framework(&patcher, &project_info.project_year, &mut changes)?;
    println!("   {}", "Checking vendor dependencies...".cyan());
    resolver.update_vendor_deps(&store, &project_info.project_year, &mut changes)?;

    print_change_summary(&changes);

    if changes.is_empty() {
        println!("\n{}", "✨ Everything is already up to date!".green().bold());
        return Ok(());
    }

    // Step 4: Commit and push
    let Some(git_agent) = git_agent else {
        println!(
            "\n{}",
            "Updates applied. Git steps skipped, nothing was committed.".yellow()
        );
        return Ok(());
    };

    println!("\n{}", "4. Committing changes...".yellow());
    git_agent.stage_update_paths()?;
    git_agent.commit(&changes.commit_message())?;
    git_agent.push_force()?;
    println!(
        "{}",
        format!("✓ Changes pushed to branch: {}", UPDATE_BRANCH).green()
    );

    if no_pr {
        println!("\n{}", "Pull-request step skipped.".yellow());
        return Ok(());
    }

    // Step 5: Create or refresh the pull request
    println!("\n{}", "5. Updating pull request...".yellow());
    match (&config.repo_slug, config.head_ref(UPDATE_BRANCH)) {
        (Some(repo_slug), Some(head)) => {
            let github = GithubClient::new(config.github_token.clone())?;
            let title = changes.pr_title();
            let body = changes.pr_body();

            match github.find_open_pull(repo_slug, &config.base_branch, &head)? {
                Some(pull) => {
                    github.update_pull(repo_slug, pull.number, &title, &body)?;
                    println!(
                        "{}",
                        format!("✓ Updated pull request #{}", pull.number).green()
                    );
                }
                None => {
                    let pull = github.create_pull(
                        repo_slug,
                        &config.base_branch,
                        UPDATE_BRANCH,
                        &title,
                        &body,
                    )?;
                    let location = pull
                        .html_url
                        .unwrap_or_else(|| format!("#{}", pull.number));
                    println!("{}", format!("✓ Opened pull request {}", location).green());
                }
            }
        }
        _ => {
            println!(
                "{}",
                "⚠ REPO_PATH not configured, skipping the pull-request step".yellow()
            );
        }
    }

    println!(
        "\n{}",
        "✨ Update process completed successfully!".green().bold()
    );
    Ok(())
}

/// Execute the check workflow (dry-run)
pub fn execute_check<P: AsRef<Path>>(project_path: P) -> Result<()> {
    let project_path = project_path.as_ref();
    let config = Config::from_env();
    println!("{}", "Checking for available updates...".cyan().bold());

    println!("\n{}", "1. Validating project structure...".yellow());
    let scanner = ProjectScannerAgent::new(project_path);
    let project_info = scanner.validate()?;
    println!(
        "{}",
        format!("✓ Project structure is valid (year {})", project_info.project_year).green()
    );

    println!("\n{}", "2. Checking for available updates...".yellow());
    let resolver = UpdateResolver::new(
        RemoteFactory::create_marketplace()?,
        RemoteFactory::create_releases(&config)?,
    );
    let patcher = BuildFilePatcher::new(&project_info.build_gradle_path);
    let store = VendorDepStore::new(&project_info.vendordeps_dir);

    let mut changes = ChangeSet::new();
    resolver.check_framework(&patcher, &project_info.project_year, &mut changes)?;
    resolver.check_vendor_deps(&store, &project_info.project_year, &mut changes)?;

    if changes.is_empty() {
        println!("\n{}", "✨ Everything is up to date!".green().bold());
        return Ok(());
    }

    println!("\n{}", "📦 Available Updates:".cyan().bold());
    for record in changes.records() {
        println!(
            "  • {} {} → {}",
            record.name.white().bold(),
            record.old_version.red(),
            record.new_version.green().bold()
        );
    }

    println!("\n{}", "To apply these updates, run:".dimmed());
    println!("  {}", "vdu update".cyan());

    Ok(())
}

/// Execute the list workflow - display all vendordep descriptors
pub fn execute_list<P: AsRef<Path>>(project_path: P) -> Result<()> {
    let project_path = project_path.as_ref();
    println!("{}", "Listing vendordep descriptors...".cyan().bold());

    let scanner = ProjectScannerAgent::new(project_path);
    let project_info = scanner.validate()?;

    let store = VendorDepStore::new(&project_info.vendordeps_dir);
    let descriptors = store.list_descriptors()?;

    println!("\n{}", "📦 Vendor dependencies:".cyan().bold());
    for descriptor in &descriptors {
        let mode = match &descriptor.lookup {
            Lookup::Marketplace { .. } => "marketplace".to_string(),
            Lookup::DirectUrl { url } => url.dimmed().to_string(),
        };
        println!(
            "  • {} {} ({})",
            descriptor.display_name.white().bold(),
            descriptor.current_version.green(),
            mode
        );
    }

    println!("\n{}", "Summary:".cyan().bold());
    println!(
        "  {} vendordeps",
        descriptors.len().to_string().yellow()
    );

    Ok(())
}

fn print_change_summary(changes: &ChangeSet) {
    if changes.is_empty() {
        println!("\n{}", "No updates were found".yellow());
        return;
    }

    println!("\n{}", "Update Summary:".cyan().bold());
    println!(
        "{}",
        format!("Total updates: {}", changes.records().len()).green()
    );

    for record in changes.records() {
        println!(
            "  • {} {} → {}",
            record.name.white().bold(),
            record.old_version.red(),
            record.new_version.green()
        );
    }
}
