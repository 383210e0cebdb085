//! Batch lifecycle executor
//!
//! Runs install, uninstall, update, activate and is-installed over the
//! cartesian product of targets and locales. Items are processed strictly
//! in order; a failed item is recorded and the batch moves on unless the
//! failure is one of the documented fatal cases.

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::outcome::{
    Activation, BatchReport, Outcome, OutcomeKind, UninstallRun, UpdateResult, UpdateRun,
};
use crate::catalog::{
    normalize_catalog, reconcile, CatalogProvider, InstallError, PackageInstaller,
    ReconciledRecord, RecordFilter, Scope, UpdateRecord,
};
use crate::error::{LangpackError, Result};
use crate::store::{ActivationStore, Category, FileStore, InstalledState, Target, BASE_LOCALE};

/// The external collaborators a lifecycle run depends on
#[derive(Clone)]
pub struct Collaborators {
    pub catalog: Arc<dyn CatalogProvider>,
    pub installer: Arc<dyn PackageInstaller>,
    pub state: Arc<dyn InstalledState>,
    pub files: Arc<dyn FileStore>,
    pub activation: Arc<dyn ActivationStore>,
}

/// How the targets of a run were chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetScope {
    /// Named on the command line
    Explicit,
    /// Every installed target of the category (`--all`)
    All,
}

/// The targets a batch runs over
#[derive(Debug, Clone)]
pub struct TargetSet {
    pub targets: Vec<Target>,
    pub scope: TargetScope,
}

impl TargetSet {
    pub fn explicit(targets: Vec<Target>) -> Self {
        Self {
            targets,
            scope: TargetScope::Explicit,
        }
    }

    pub fn all(targets: Vec<Target>) -> Self {
        Self {
            targets,
            scope: TargetScope::All,
        }
    }

    fn is_single(&self) -> bool {
        self.scope == TargetScope::Explicit && self.targets.len() == 1
    }
}

/// Executes lifecycle commands for one package category
pub struct LifecycleExecutor {
    category: Category,
    collaborators: Collaborators,
}

impl LifecycleExecutor {
    pub fn new(category: Category, collaborators: Collaborators) -> Self {
        Self {
            category,
            collaborators,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Every target of this category
    pub fn targets(&self) -> Result<Vec<Target>> {
        Ok(self.collaborators.state.targets(self.category)?)
    }

    /// Resolve named slugs to installed targets, in the order given
    pub fn resolve(&self, slugs: &[String]) -> Result<Vec<Target>> {
        let known = self.targets()?;

        slugs
            .iter()
            .map(|slug| {
                known
                    .iter()
                    .find(|t| &t.slug == slug)
                    .cloned()
                    .ok_or_else(|| {
                        LangpackError::Validation(format!(
                            "The {} '{}' is not installed.",
                            self.category, slug
                        ))
                    })
            })
            .collect()
    }

    /// Reconciled catalog records for each target, filtered
    #[instrument(name = "list", skip_all, fields(category = %self.category))]
    pub async fn list(
        &self,
        targets: &[Target],
        filter: &RecordFilter,
    ) -> Result<Vec<ReconciledRecord>> {
        let active = self.collaborators.activation.active_locale()?;
        let mut records = Vec::new();

        for target in targets {
            let catalog = normalize_catalog(
                self.collaborators
                    .catalog
                    .fetch_catalog(self.category, target)
                    .await?,
            );
            let installed = self
                .collaborators
                .state
                .installed_locales(self.category, target)?;
            let translations = self
                .collaborators
                .state
                .installed_translations(self.category, target)?;

            let pending = if translations.is_empty() {
                Vec::new()
            } else {
                self.collaborators
                    .catalog
                    .fetch_pending_updates(self.category, &translations)
                    .await?
            };

            let scope = Scope {
                category: self.category,
                slug: &target.slug,
            };
            let reconciled = reconcile(&catalog, &installed, &pending, &active, Some(scope));
            debug!("{} catalog records for {}", reconciled.len(), target);
            records.extend(filter.apply(reconciled));
        }

        Ok(records)
    }

    /// Install every (target, locale) pair, optionally activating the locale
    #[instrument(name = "install", skip_all, fields(category = %self.category))]
    pub async fn install(
        &self,
        targets: &TargetSet,
        locales: &[String],
        activate: bool,
    ) -> Result<BatchReport> {
        if locales.is_empty() {
            return Err(LangpackError::Validation(
                "Please specify one or more languages.".to_string(),
            ));
        }
        if activate && !targets.is_single() {
            return Err(LangpackError::Validation(
                "Only a single target can be named when activating a language.".to_string(),
            ));
        }
        if activate && locales.len() > 1 {
            return Err(LangpackError::Validation(
                "Only a single language can be active.".to_string(),
            ));
        }

        let single = targets.is_single() && locales.len() == 1;
        let mut report = BatchReport::new(targets.targets.len() * locales.len());

        for target in &targets.targets {
            for locale in locales {
                let installed = self
                    .collaborators
                    .state
                    .installed_locales(self.category, target)?;

                let (outcome, kind) = if installed.contains(locale) {
                    info!("Language '{}' already installed for {}.", locale, target);
                    (Outcome::AlreadyInstalled, OutcomeKind::Skip)
                } else {
                    match self
                        .collaborators
                        .installer
                        .install_package(self.category, target, locale)
                        .await
                    {
                        Ok(()) => {
                            info!("Language '{}' installed for {}.", locale, target);
                            (Outcome::Installed, OutcomeKind::Success)
                        }
                        Err(InstallError::NotFound { .. }) if single => {
                            return Err(LangpackError::LocaleNotFound {
                                locale: locale.clone(),
                                target: target.to_string(),
                            });
                        }
                        Err(InstallError::NotFound { .. }) => {
                            warn!("Language '{}' not available for {}.", locale, target);
                            (Outcome::NotAvailable, OutcomeKind::Skip)
                        }
                        Err(InstallError::Other(e)) => {
                            warn!("Language '{}' not installed for {}: {:#}", locale, target, e);
                            (Outcome::NotInstalled, OutcomeKind::Error)
                        }
                    }
                };

                report.push(&target.name, locale, outcome, kind);

                if activate && matches!(outcome, Outcome::Installed | Outcome::AlreadyInstalled) {
                    report.activation = Some(self.activate(target, locale)?);
                }
            }
        }

        Ok(report)
    }

    /// Remove the files owned by every (target, locale) pair
    #[instrument(name = "uninstall", skip_all, fields(category = %self.category))]
    pub fn uninstall(&self, targets: &TargetSet, locales: &[String]) -> Result<UninstallRun> {
        if locales.is_empty() {
            return Err(LangpackError::Validation(
                "Please specify one or more languages.".to_string(),
            ));
        }
        if targets.targets.is_empty() {
            return Ok(UninstallRun::Completed(BatchReport::new(0)));
        }

        let dir = self.collaborators.state.language_dir(self.category);
        let mut listing = self
            .collaborators
            .files
            .list_directory(&dir)
            .map_err(|source| LangpackError::DirectoryUnreadable {
                path: dir.clone(),
                source,
            })?;
        let active = self.collaborators.activation.active_locale()?;

        let single = targets.is_single() && locales.len() == 1;
        let mut report = BatchReport::new(targets.targets.len() * locales.len());

        for target in &targets.targets {
            for locale in locales {
                let installed = self
                    .collaborators
                    .state
                    .installed_locales(self.category, target)?;

                if !installed.contains(locale) {
                    if single {
                        return Err(LangpackError::NotInstalled {
                            locale: locale.clone(),
                            target: target.to_string(),
                        });
                    }
                    let kind = match targets.scope {
                        TargetScope::All => OutcomeKind::Skip,
                        TargetScope::Explicit => OutcomeKind::Error,
                    };
                    report.push(&target.name, locale, Outcome::NotInstalled, kind);
                    continue;
                }

                if *locale == active {
                    warn!(
                        "The '{}' language is active; not uninstalling for {}.",
                        locale, target
                    );
                    return Ok(UninstallRun::Aborted {
                        locale: locale.clone(),
                        target: target.to_string(),
                    });
                }

                let owned =
                    self.collaborators
                        .state
                        .owned_files(self.category, target, locale, &listing);
                if owned.is_empty() {
                    report.push(
                        &target.name,
                        locale,
                        Outcome::AlreadyUninstalled,
                        OutcomeKind::Skip,
                    );
                    continue;
                }

                let mut removed = 0;
                for name in &owned {
                    if self.collaborators.files.delete_file(&dir.join(name)) {
                        debug!("Removed {}", name);
                        removed += 1;
                        listing.retain(|n| n != name);
                    }
                }

                let (outcome, kind) = if removed == owned.len() {
                    info!("Language '{}' uninstalled for {}.", locale, target);
                    (Outcome::Uninstalled, OutcomeKind::Success)
                } else if removed == 0 {
                    warn!("Couldn't uninstall language '{}' for {}.", locale, target);
                    (Outcome::FailedToUninstall, OutcomeKind::Error)
                } else {
                    warn!(
                        "Language '{}' only partially uninstalled for {} ({} of {} files).",
                        locale,
                        target,
                        removed,
                        owned.len()
                    );
                    (Outcome::PartiallyUninstalled, OutcomeKind::Error)
                };
                report.push(&target.name, locale, outcome, kind);
            }
        }

        Ok(UninstallRun::Completed(report))
    }

    /// Apply (or list, with `dry_run`) pending updates for the targets
    #[instrument(name = "update", skip_all, fields(category = %self.category, dry_run = dry_run))]
    pub async fn update(&self, targets: &[Target], dry_run: bool) -> Result<UpdateRun> {
        let mut installed = Vec::new();
        for target in targets {
            installed.extend(
                self.collaborators
                    .state
                    .installed_translations(self.category, target)?,
            );
        }
        if installed.is_empty() {
            return Ok(UpdateRun::UpToDate);
        }

        let mut pending: Vec<UpdateRecord> = self
            .collaborators
            .catalog
            .fetch_pending_updates(self.category, &installed)
            .await?;
        pending.retain(|u| {
            installed
                .iter()
                .any(|i| i.target.slug == u.slug && i.locale == u.locale)
        });

        if pending.is_empty() {
            info!("Translations are up to date.");
            return Ok(UpdateRun::UpToDate);
        }
        if dry_run {
            return Ok(UpdateRun::DryRun(pending));
        }

        let mut results = Vec::with_capacity(pending.len());
        for update in pending {
            let Some(target) = targets.iter().find(|t| t.slug == update.slug) else {
                continue;
            };

            let updated = match self
                .collaborators
                .installer
                .install_package(self.category, target, &update.locale)
                .await
            {
                Ok(()) => {
                    info!("Updated '{}' translation for {}.", update.locale, target);
                    true
                }
                Err(e) => {
                    warn!(
                        "Failed to update '{}' translation for {}: {}",
                        update.locale, target, e
                    );
                    false
                }
            };
            results.push(UpdateResult { update, updated });
        }

        Ok(UpdateRun::Applied(results))
    }

    /// Make an installed locale the active one
    pub fn activate(&self, target: &Target, locale: &str) -> Result<Activation> {
        let installed = self
            .collaborators
            .state
            .installed_locales(self.category, target)?;
        if !installed.contains(locale) {
            return Err(LangpackError::NotInstalled {
                locale: locale.to_string(),
                target: target.to_string(),
            });
        }

        let active = self.collaborators.activation.active_locale()?;
        if active == locale {
            warn!("Language '{}' is already active.", locale);
            return Ok(Activation::AlreadyActive {
                locale: locale.to_string(),
            });
        }

        let setting = (locale != BASE_LOCALE).then_some(locale);
        self.collaborators.activation.set_active_locale(setting)?;

        Ok(Activation::Activated {
            locale: locale.to_string(),
        })
    }

    /// Whether every given locale is installed for the target
    pub fn is_installed(&self, target: &Target, locales: &[String]) -> Result<bool> {
        if locales.is_empty() {
            return Err(LangpackError::Validation(
                "Please specify one or more languages.".to_string(),
            ));
        }

        let installed = self
            .collaborators
            .state
            .installed_locales(self.category, target)?;
        Ok(locales.iter().all(|l| installed.contains(l)))
    }
}
