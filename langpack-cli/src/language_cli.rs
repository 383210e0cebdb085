//! Language pack commands for core, plugins and themes
//!
//! `langpack core ...` manages the product's own translations;
//! `langpack plugin ...` and `langpack theme ...` manage extension
//! translations for one named extension or, with `--all`, every installed one.

use anyhow::Result;
use clap::{Args, Subcommand};

use langpack_core::catalog::RecordFilter;
use langpack_core::lifecycle::{
    Collaborators, LifecycleExecutor, RunStatus, TargetSet, UninstallRun, UpdateRun,
};
use langpack_core::store::{Category, Target};
use langpack_core::LangpackError;

use crate::output::{
    render_records, render_results, render_update_results, render_updates, report, OutputFormat,
};

/// Field filters shared by every `list` command
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Only show these locales (comma-separated)
    #[clap(long)]
    locale: Option<String>,

    /// Only show these English names (comma-separated)
    #[clap(long)]
    english_name: Option<String>,

    /// Only show these native names (comma-separated)
    #[clap(long)]
    native_name: Option<String>,

    /// Only show these statuses: active, installed, uninstalled
    #[clap(long)]
    status: Option<String>,

    /// Only show these update states: available, none
    #[clap(long)]
    update: Option<String>,
}

impl FilterArgs {
    fn into_filter(self) -> Result<RecordFilter, LangpackError> {
        let constraints = [
            ("locale", self.locale),
            ("english_name", self.english_name),
            ("native_name", self.native_name),
            ("status", self.status),
            ("update", self.update),
        ];

        constraints
            .into_iter()
            .try_fold(RecordFilter::new(), |filter, (field, accepted)| match accepted {
                Some(accepted) => filter.constrain(field, &accepted),
                None => Ok(filter),
            })
    }
}

/// Core language commands
#[derive(Subcommand, Debug)]
pub enum CoreCommand {
    /// List the languages offered for core
    List {
        #[clap(flatten)]
        filters: FilterArgs,

        #[clap(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Install one or more languages
    Install {
        /// Locales to install (e.g. nl_NL)
        #[clap(required = true)]
        locales: Vec<String>,

        /// Make the installed language active
        #[clap(long)]
        activate: bool,

        #[clap(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Uninstall one or more languages
    Uninstall {
        #[clap(required = true)]
        locales: Vec<String>,

        #[clap(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Update installed languages
    Update {
        /// Show available updates without installing them
        #[clap(long)]
        dry_run: bool,

        #[clap(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Activate an installed language
    Activate { locale: String },

    /// Exit 0 if every given language is installed, 1 otherwise
    IsInstalled {
        #[clap(required = true)]
        locales: Vec<String>,
    },
}

/// Plugin and theme language commands
#[derive(Subcommand, Debug)]
pub enum ExtensionCommand {
    /// List the languages offered for one or all extensions
    List {
        /// Extension slug (omit with --all)
        slug: Option<String>,

        /// Every installed extension
        #[clap(long)]
        all: bool,

        #[clap(flatten)]
        filters: FilterArgs,

        #[clap(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Install languages: `<slug> <locale>...` or `--all <locale>...`
    Install {
        #[clap(required = true)]
        args: Vec<String>,

        #[clap(long)]
        all: bool,

        #[clap(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Uninstall languages: `<slug> <locale>...` or `--all <locale>...`
    Uninstall {
        #[clap(required = true)]
        args: Vec<String>,

        #[clap(long)]
        all: bool,

        #[clap(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Update installed languages of the named extensions
    Update {
        slugs: Vec<String>,

        #[clap(long)]
        all: bool,

        #[clap(long)]
        dry_run: bool,

        #[clap(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Exit 0 if every given language is installed for the extension, 1 otherwise
    IsInstalled {
        slug: String,

        #[clap(required = true)]
        locales: Vec<String>,
    },
}

/// Run a core language command
pub async fn execute_core(command: CoreCommand, collaborators: Collaborators) -> Result<RunStatus> {
    let executor = LifecycleExecutor::new(Category::Core, collaborators);
    let core = executor.targets()?;

    match command {
        CoreCommand::List { filters, format } => {
            execute_list(&executor, &core, filters, format).await
        }
        CoreCommand::Install {
            locales,
            activate,
            format,
        } => execute_install(&executor, TargetSet::explicit(core), &locales, activate, format).await,
        CoreCommand::Uninstall { locales, format } => {
            execute_uninstall(&executor, TargetSet::explicit(core), &locales, format)
        }
        CoreCommand::Update { dry_run, format } => {
            execute_update(&executor, &core, dry_run, format).await
        }
        CoreCommand::Activate { locale } => execute_activate(&executor, &core, &locale),
        CoreCommand::IsInstalled { locales } => execute_is_installed(&executor, &core, &locales),
    }
}

/// Run a plugin or theme language command
pub async fn execute_extension(
    category: Category,
    command: ExtensionCommand,
    collaborators: Collaborators,
) -> Result<RunStatus> {
    let executor = LifecycleExecutor::new(category, collaborators);

    match command {
        ExtensionCommand::List {
            slug,
            all,
            filters,
            format,
        } => {
            let targets = match (slug, all) {
                (_, true) => executor.targets()?,
                (Some(slug), false) => executor.resolve(&[slug])?,
                (None, false) => return Err(missing_target(category).into()),
            };
            execute_list(&executor, &targets, filters, format).await
        }
        ExtensionCommand::Install { args, all, format } => {
            let (targets, locales) = split_target_args(&executor, args, all)?;
            execute_install(&executor, targets, &locales, false, format).await
        }
        ExtensionCommand::Uninstall { args, all, format } => {
            let (targets, locales) = split_target_args(&executor, args, all)?;
            execute_uninstall(&executor, targets, &locales, format)
        }
        ExtensionCommand::Update {
            slugs,
            all,
            dry_run,
            format,
        } => {
            let targets = if all {
                executor.targets()?
            } else if slugs.is_empty() {
                return Err(missing_target(category).into());
            } else {
                executor.resolve(&slugs)?
            };
            execute_update(&executor, &targets, dry_run, format).await
        }
        ExtensionCommand::IsInstalled { slug, locales } => {
            // An unknown extension is answered by the exit status alone
            let targets = match executor.resolve(&[slug]) {
                Ok(targets) => targets,
                Err(LangpackError::Validation(reason)) => {
                    tracing::debug!("{reason}");
                    return Ok(RunStatus::Error);
                }
                Err(e) => return Err(e.into()),
            };
            execute_is_installed(&executor, &targets, &locales)
        }
    }
}

fn missing_target(category: Category) -> LangpackError {
    LangpackError::Validation(format!(
        "Please specify one or more {category}s, or use --all."
    ))
}

/// `<slug> <locale>...` or, with `--all`, `<locale>...`
fn split_target_args(
    executor: &LifecycleExecutor,
    mut args: Vec<String>,
    all: bool,
) -> Result<(TargetSet, Vec<String>)> {
    if all {
        return Ok((TargetSet::all(executor.targets()?), args));
    }

    if args.len() < 2 {
        return Err(missing_target(executor.category()).into());
    }
    let slug = args.remove(0);
    let targets = executor.resolve(&[slug])?;
    Ok((TargetSet::explicit(targets), args))
}

async fn execute_list(
    executor: &LifecycleExecutor,
    targets: &[Target],
    filters: FilterArgs,
    format: OutputFormat,
) -> Result<RunStatus> {
    let filter = filters.into_filter()?;
    let records = executor.list(targets, &filter).await?;

    println!("{}", render_records(&records, format)?);
    Ok(RunStatus::Success)
}

async fn execute_install(
    executor: &LifecycleExecutor,
    targets: TargetSet,
    locales: &[String],
    activate: bool,
    format: OutputFormat,
) -> Result<RunStatus> {
    let batch = executor.install(&targets, locales, activate).await?;

    if !batch.results.is_empty() {
        println!("{}", render_results(&batch.results, format)?);
    }
    if let Some(activation) = &batch.activation {
        report(activation.status(), &activation.message(), format);
    }

    let status = batch.tally.status();
    report(status, &batch.tally.summary("installed"), format);
    Ok(status)
}

fn execute_uninstall(
    executor: &LifecycleExecutor,
    targets: TargetSet,
    locales: &[String],
    format: OutputFormat,
) -> Result<RunStatus> {
    match executor.uninstall(&targets, locales)? {
        UninstallRun::Aborted { locale, target } => {
            report(
                RunStatus::Warning,
                &format!(
                    "The '{locale}' language is active for {target}; activate another language first."
                ),
                format,
            );
            Ok(RunStatus::Warning)
        }
        UninstallRun::Completed(batch) => {
            if !batch.results.is_empty() {
                println!("{}", render_results(&batch.results, format)?);
            }
            let status = batch.tally.status();
            report(status, &batch.tally.summary("uninstalled"), format);
            Ok(status)
        }
    }
}

async fn execute_update(
    executor: &LifecycleExecutor,
    targets: &[Target],
    dry_run: bool,
    format: OutputFormat,
) -> Result<RunStatus> {
    let run = executor.update(targets, dry_run).await?;

    match &run {
        UpdateRun::UpToDate => {}
        UpdateRun::DryRun(updates) => println!("{}", render_updates(updates, format)?),
        UpdateRun::Applied(results) => println!("{}", render_update_results(results, format)?),
    }

    let status = run.status();
    report(status, &run.summary(), format);
    Ok(status)
}

fn execute_activate(
    executor: &LifecycleExecutor,
    targets: &[Target],
    locale: &str,
) -> Result<RunStatus> {
    let Some(target) = targets.first() else {
        return Err(LangpackError::Validation("No core target found.".to_string()).into());
    };

    let activation = executor.activate(target, locale)?;
    let status = activation.status();
    report(status, &activation.message(), OutputFormat::Table);
    Ok(status)
}

fn execute_is_installed(
    executor: &LifecycleExecutor,
    targets: &[Target],
    locales: &[String],
) -> Result<RunStatus> {
    let installed = targets
        .iter()
        .map(|target| executor.is_installed(target, locales))
        .collect::<Result<Vec<bool>, LangpackError>>()?;

    Ok(if installed.iter().all(|&i| i) {
        RunStatus::Success
    } else {
        RunStatus::Error
    })
}

/// Run `switch-language <locale>`, the short form of `core activate`
pub fn execute_switch_language(locale: &str, collaborators: Collaborators) -> Result<RunStatus> {
    let executor = LifecycleExecutor::new(Category::Core, collaborators);
    let core = executor.targets()?;
    execute_activate(&executor, &core, locale)
}
