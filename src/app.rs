//! Generation pipeline: validate, distill, generate, drift-check, normalize.

use crate::ai::{GeminiGenerationClient, GenerationService, OpenAiGenerationClient};
use crate::compose::{compose, distillation_request, distilled_topic, drift_request};
use crate::config::{AiProvider, Config, LocalSettings};
use crate::mode::{self, Mode};
use crate::models::{GenerationInputs, GenerationResult};
use crate::normalize::{draft_text, JsonPolicy, Normalizer};
use crate::sheets::{build_sink, AuthSession, PersistenceSink};
use crate::Result;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Runs one generation at a time against a provider, with an optional sink
/// for saving results.
pub struct App {
    generator: Box<dyn GenerationService>,
    sink: Option<Box<dyn PersistenceSink>>,
    normalizer: Normalizer,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub generator: Box<dyn GenerationService>,
    pub sink: Option<Box<dyn PersistenceSink>>,
}

/// Outcome of the best-effort distillation step.
struct Distillation {
    insight: String,
    topic: String,
}

impl App {
    /// Build an app from concrete service dependencies.
    pub fn with_services(services: AppServices, policy: JsonPolicy) -> Self {
        Self {
            generator: services.generator,
            sink: services.sink,
            normalizer: Normalizer::new(policy),
        }
    }

    fn build_generator(config: &Config, http_client: reqwest::Client) -> Box<dyn GenerationService> {
        match config.provider {
            AiProvider::Gemini => {
                info!("Generation provider: Gemini (model: {})", config.model);
                let client = GeminiGenerationClient::new_with_client(
                    config.api_key.clone(),
                    config.model.clone(),
                    config.request_timeout,
                    http_client,
                );
                let client = match &config.base_url {
                    Some(url) => client.with_base_url(url.clone()),
                    None => client,
                };
                Box::new(client)
            }
            AiProvider::OpenAi => {
                info!("Generation provider: OpenAI (model: {})", config.model);
                let client = OpenAiGenerationClient::new_with_client(
                    config.api_key.clone(),
                    config.model.clone(),
                    config.request_timeout,
                    http_client,
                );
                let client = match &config.base_url {
                    Some(url) => client.with_base_url(url.clone()),
                    None => client,
                };
                Box::new(client)
            }
        }
    }

    /// Construct an app from environment configuration and stored settings.
    pub fn new(config: &Config, settings: &LocalSettings, auth: Arc<AuthSession>) -> Result<Self> {
        // Reuse one HTTP connection pool across provider and sink.
        let http_client = reqwest::Client::builder().build()?;

        let generator = Self::build_generator(config, http_client.clone());
        let sink = build_sink(config, settings, auth, http_client);

        Ok(Self::with_services(
            AppServices { generator, sink },
            config.json_policy,
        ))
    }

    pub fn sink(&self) -> Option<&dyn PersistenceSink> {
        self.sink.as_deref()
    }

    /// Run the full pipeline for one set of inputs. Validation failures make
    /// no provider call; any provider failure after distillation aborts the
    /// run without a partial result.
    pub async fn generate(&self, inputs: &GenerationInputs) -> Result<GenerationResult> {
        let mode = mode::validate(inputs)?;
        let span = info_span!("generate", run_id = %Uuid::new_v4(), mode = %mode);

        self.run(mode, inputs).instrument(span).await
    }

    async fn run(&self, mode: Mode, inputs: &GenerationInputs) -> Result<GenerationResult> {
        info!("Starting {} generation", mode);

        let distilled = self.distill(inputs).await;
        let request = compose(
            mode,
            inputs,
            distilled.as_ref().map(|step| step.topic.as_str()),
        );
        let raw = self.generator.generate(&request).await?;
        debug!("Provider returned {} chars", raw.len());

        let mut result = match mode {
            Mode::Standard => {
                let draft = draft_text(&raw);
                let verdict = self
                    .generator
                    .generate(&drift_request(&inputs.persona, &draft))
                    .await?;
                self.normalizer.drift(&draft, &verdict)?
            }
            Mode::MultiFormat => self.normalizer.multi_format(&raw)?,
            Mode::Batch { count } => self.normalizer.batch(&raw, count.get())?,
            Mode::Carousel => self.normalizer.carousel(&raw)?,
            Mode::Summarizer | Mode::SummarizerExam => self.normalizer.summary(&raw, mode),
        };
        result.distilled_insight = distilled.map(|step| step.insight);

        info!(
            "Generation complete (drift score: {})",
            result
                .drift_score
                .map(|score| score.to_string())
                .unwrap_or_else(|| "n/a".to_string())
        );
        Ok(result)
    }

    /// Never fails the run: any error or empty answer keeps the original topic.
    async fn distill(&self, inputs: &GenerationInputs) -> Option<Distillation> {
        if !inputs.enable_distillation {
            return None;
        }
        if inputs.topic.trim().is_empty() {
            debug!("Distillation skipped: empty topic");
            return None;
        }

        match self
            .generator
            .generate(&distillation_request(&inputs.topic))
            .await
        {
            Ok(text) if !text.trim().is_empty() => {
                let insight = text.trim().to_string();
                info!("Distilled insight: {}", insight);
                Some(Distillation {
                    topic: distilled_topic(&insight, &inputs.topic),
                    insight,
                })
            }
            Ok(_) => {
                warn!("Distillation returned no text, using the original topic");
                None
            }
            Err(e) => {
                warn!("Distillation failed, using the original topic: {}", e);
                None
            }
        }
    }
}
