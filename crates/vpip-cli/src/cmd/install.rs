//! Install command

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use vpip_core::config::Settings;
use vpip_core::io::index::{HttpIndexFetcher, IndexFetcher, fetch_candidates};
use vpip_core::{
    CandidateSet, ForcedVariant, ResolutionRequest, ResolveError, Resolver, TracingReporter,
};
use vpip_schema::{Artifact, PackageName};

use crate::InstallArgs;
use crate::progress::fake_install_progress;

/// How long the progress bar takes to fill.
const INSTALL_ANIMATION: Duration = Duration::from_millis(500);

/// Resolve and "install" one package.
///
/// Returns exit code 1 when no candidate can be chosen, after logging why.
pub async fn install(args: InstallArgs, quiet: bool) -> Result<ExitCode> {
    let settings = Settings::load();
    let fetcher = HttpIndexFetcher::default();

    match select(&args, settings, &fetcher).await {
        Ok(artifact) => {
            tracing::info!("Installing: {} ...", artifact.filename);
            if !quiet {
                tokio::task::spawn_blocking(|| {
                    fake_install_progress(&mut std::io::stdout(), INSTALL_ANIMATION)
                })
                .await
                .context("Progress task panicked")?
                .context("Failed to draw progress")?;
            }
            tracing::info!(
                "The package: `{}` (Version: `{}`) was installed with success ...",
                args.package,
                artifact.version
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!("No candidate package was found for `{}`: {e}", args.package);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Build the resolution request from flags and config.
pub fn request(args: &InstallArgs, settings: &Settings) -> ResolutionRequest {
    let index_url = args
        .index_url
        .clone()
        .unwrap_or_else(|| settings.index_url().to_string());

    let mut request = ResolutionRequest::new(PackageName::new(&args.package), index_url)
        .with_variants_disabled(args.no_variants)
        .with_forced(args.variant_hash.as_deref().and_then(ForcedVariant::parse));
    if !args.variant_providers.is_empty() {
        request = request.with_provider_priority(args.variant_providers.clone());
    }
    request
}

async fn select(
    args: &InstallArgs,
    settings: Settings,
    fetcher: &dyn IndexFetcher,
) -> Result<Artifact, ResolveError> {
    let request = request(args, &settings);
    tracing::info!(
        "Received install request for: `{}` from index: {}.",
        request.package_name,
        request.index_url
    );

    let listed = fetch_candidates(fetcher, &request.package_name, &request.index_url).await;
    for artifact in &listed {
        tracing::info!("Found: {}", artifact.filename);
    }
    let candidates = CandidateSet::from_candidates(listed);

    let settings = Arc::new(settings);
    let resolver = Resolver::new(settings.clone(), settings, TracingReporter);
    resolver.select(&request, &candidates).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use vpip_core::io::index::{FetchError, IndexResponse};
    use vpip_schema::VariantHash;

    const PAGE: &str = r#"<a href="https://x/dummy-1.0.0-py3-none-any.whl">g</a>
<a href="https://x/dummy-1.0.0~abcd1234-py3-none-any.whl">v</a>"#;

    struct StaticIndex(u16, &'static str);

    #[async_trait]
    impl IndexFetcher for StaticIndex {
        async fn fetch(&self, _: &str, _: Duration) -> Result<IndexResponse, FetchError> {
            Ok(IndexResponse {
                status: self.0,
                body: self.1.to_string(),
            })
        }
    }

    fn args(extra: &[&str]) -> InstallArgs {
        use clap::Parser;
        let mut argv = vec!["vpip", "install", "Dummy_Pkg"];
        argv.extend_from_slice(extra);
        let crate::Commands::Install(args) = crate::Cli::try_parse_from(argv).unwrap().command;
        args
    }

    #[test]
    fn test_request_defaults_to_configured_index() {
        let settings = Settings::from_toml("index_url = \"http://cfg/simple\"").unwrap();
        let mut install = args(&[]);
        install.index_url = None;
        install.variant_hash = None;
        let req = request(&install, &settings);
        assert_eq!(req.package_name, "dummy-pkg");
        assert_eq!(req.index_url, "http://cfg/simple");
        assert_eq!(req.provider_priority, None);
        assert_eq!(req.forced, None);
        assert!(!req.variants_disabled);
    }

    #[test]
    fn test_request_flags_override() {
        let settings = Settings::default();
        let req = request(
            &args(&[
                "-i",
                "http://flag/simple",
                "--variant_provider",
                "gcc",
                "--variant-hash",
                "no-variant",
                "--no_variants",
            ]),
            &settings,
        );
        assert_eq!(req.index_url, "http://flag/simple");
        assert_eq!(req.provider_priority, Some(vec!["gcc".to_string()]));
        assert_eq!(req.forced, Some(ForcedVariant::NoVariant));
        assert!(req.variants_disabled);
    }

    #[tokio::test]
    async fn test_select_reports_forced_variant_not_found() {
        let install = args(&["-i", "http://index/simple", "--variant-hash", "ffffffff"]);
        let err = select(&install, Settings::default(), &StaticIndex(200, PAGE))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::ForcedVariantNotFound {
                hash: VariantHash::new("ffffffff").unwrap()
            }
        );
    }

    #[tokio::test]
    async fn test_select_reports_no_candidates() {
        let install = args(&["-i", "http://index/simple", "--variant-hash", "no-variant"]);
        let err = select(&install, Settings::default(), &StaticIndex(404, ""))
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::NoCandidates);
    }

    #[tokio::test]
    async fn test_select_picks_forced_variant() {
        let install = args(&["-i", "http://index/simple", "--variant-hash", "abcd1234"]);
        let artifact = select(&install, Settings::default(), &StaticIndex(200, PAGE))
            .await
            .unwrap();
        assert_eq!(artifact.filename, "dummy-1.0.0~abcd1234-py3-none-any.whl");
    }
}
