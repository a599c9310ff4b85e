//! End-to-end pitch pipeline: domain → brand → industry → plan + copy → record.

use std::sync::Arc;
use std::time::Instant;

use brandpitch_brand::BrandResolver;
use brandpitch_llm::{LlmClient, OpenRouterClient};
use brandpitch_shared::{
    AppConfig, BrandPitchError, BrandProfile, ContentRecord, IndustryDetermination,
    ModelSettings, Result, RunId,
};
use tracing::{info, instrument};

use crate::catalog::Catalog;
use crate::generator::{self, BrandBrief};
use crate::{classifier, journey};

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called once brand facts are available.
    fn brand_resolved(&self, brand: &BrandProfile);
    /// Called once an industry is chosen.
    fn classified(&self, determination: &IndustryDetermination);
    /// Called when the record is complete.
    fn done(&self, record: &ContentRecord);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn brand_resolved(&self, _brand: &BrandProfile) {}
    fn classified(&self, _determination: &IndustryDetermination) {}
    fn done(&self, _record: &ContentRecord) {}
}

/// The three caller-facing entry points over one resolver, one model client
/// and one catalog.
///
/// Holds only immutable state, so one instance can serve concurrent runs.
pub struct Pipeline {
    resolver: Option<BrandResolver>,
    llm: Arc<dyn LlmClient>,
    catalog: Catalog,
    settings: ModelSettings,
}

impl Pipeline {
    /// A pipeline without brand lookup. Add one with [`Pipeline::with_resolver`].
    pub fn new(llm: Arc<dyn LlmClient>, catalog: Catalog, settings: ModelSettings) -> Self {
        Self {
            resolver: None,
            llm,
            catalog,
            settings,
        }
    }

    pub fn with_resolver(mut self, resolver: BrandResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Model client, catalog and settings from config. Fails when the model
    /// credential is absent or the catalog override is unusable.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let llm = OpenRouterClient::from_config(&config.openrouter)?;
        let catalog = Catalog::from_config(&config.catalog)?;
        Ok(Self::new(
            Arc::new(llm),
            catalog,
            ModelSettings::from(config),
        ))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    /// Resolve a raw domain or URL to brand facts.
    pub async fn lookup_brand(&self, domain: &str) -> Result<BrandProfile> {
        let resolver = self
            .resolver
            .as_ref()
            .ok_or_else(|| BrandPitchError::config("brand lookup is not configured"))?;
        resolver.resolve(domain).await
    }

    /// Pick the catalog industry for a brand.
    pub async fn classify_industry(
        &self,
        name: &str,
        description: &str,
    ) -> Result<IndustryDetermination> {
        classifier::classify(
            self.llm.as_ref(),
            &self.settings,
            name,
            description,
            &self.catalog,
        )
        .await
    }

    /// Expand the industry's journey, generate copy and merge both with the
    /// brand facts.
    pub async fn build_content_record(
        &self,
        brand: BrandProfile,
        industry: &str,
    ) -> Result<ContentRecord> {
        self.build_record(RunId::new(), brand, industry).await
    }

    /// Lookup, classification and generation for one domain.
    #[instrument(skip_all, fields(domain = %domain.trim()))]
    pub async fn run(&self, domain: &str, progress: &dyn ProgressReporter) -> Result<ContentRecord> {
        progress.phase("Looking up brand");
        let brand = self.lookup_brand(domain).await?;
        progress.brand_resolved(&brand);

        self.run_for_brand(brand, None, progress).await
    }

    /// Classification (unless `industry` is given) and generation for brand
    /// facts already in hand, such as manually entered ones.
    #[instrument(skip_all, fields(brand = %brand.name, run_id))]
    pub async fn run_for_brand(
        &self,
        brand: BrandProfile,
        industry: Option<&str>,
        progress: &dyn ProgressReporter,
    ) -> Result<ContentRecord> {
        let start = Instant::now();
        let run_id = RunId::new();
        tracing::Span::current().record("run_id", tracing::field::display(&run_id));

        let industry = match industry {
            Some(industry) => industry.to_string(),
            None => {
                progress.phase("Classifying industry");
                let determination = self
                    .classify_industry(&brand.name, &brand.description)
                    .await?;
                progress.classified(&determination);
                determination.industry
            }
        };

        progress.phase("Generating copy");
        let record = self.build_record(run_id, brand, &industry).await?;

        info!(
            %run_id,
            industry = %record.industry,
            channels = record.plan.channel_order.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "content record ready"
        );
        progress.done(&record);

        Ok(record)
    }

    async fn build_record(
        &self,
        run_id: RunId,
        brand: BrandProfile,
        industry: &str,
    ) -> Result<ContentRecord> {
        let plan = journey::expand(industry, &self.catalog);
        let copy = generator::generate(
            self.llm.as_ref(),
            &self.settings,
            BrandBrief::from(&brand),
            industry,
            &self.catalog,
        )
        .await?;
        Ok(generator::merge(run_id, industry, brand, copy, plan))
    }
}
