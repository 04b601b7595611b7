//! Document analysis orchestration.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::cache::ResultCache;
use crate::constants::SNIPPET_CHARS;
use crate::context::ServiceContext;
use crate::hashing::hash_document;
use crate::segment::segment;
use crate::semindex::SearchHit;

use super::classify::{classify, Classification};
use super::error::AnalyzeError;
use super::thresholds::Thresholds;
use super::types::{
    round2, AnalysisMode, AnalysisReport, DetectionLayer, MatchCandidate, MatchType, ReportStats,
    SentenceVerdict,
};

/// Runs the detection cascade over whole documents.
///
/// `analyze` is synchronous and CPU-bound; the gateway calls it on a
/// blocking thread. The analyzer itself is cheap to clone: all heavy state
/// lives behind [`ServiceContext`].
#[derive(Clone)]
pub struct Analyzer {
    context: Arc<ServiceContext>,
    cache: Arc<ResultCache>,
    thresholds: Thresholds,
}

impl Analyzer {
    pub fn new(context: Arc<ServiceContext>, cache: Arc<ResultCache>, thresholds: Thresholds) -> Self {
        Self {
            context,
            cache,
            thresholds,
        }
    }

    /// Analyzes one document, consulting the result cache first.
    ///
    /// The cache key is the blake3 hash of the trimmed text plus the mode,
    /// so repeated submissions of the same document return byte-identical
    /// reports without re-running any layer.
    #[instrument(skip(self, text), fields(text_len = text.len(), mode = %mode))]
    pub fn analyze(&self, text: &str, mode: AnalysisMode) -> Result<AnalysisReport, AnalyzeError> {
        if text.trim().is_empty() {
            return Err(AnalyzeError::NoText);
        }

        let hash = hash_document(text);
        if let Some(report) = self.cache.get(&hash, mode) {
            info!("Returning cached analysis");
            return Ok(report);
        }

        let report = self.run(text, mode);
        self.cache.put(&hash, mode, &report);
        Ok(report)
    }

    fn run(&self, text: &str, mode: AnalysisMode) -> AnalysisReport {
        let sentences = segment(text);
        if sentences.is_empty() {
            debug!("Document segmented to zero sentences");
            return AnalysisReport::empty(text);
        }

        let thresholds = self.thresholds.for_mode(mode);
        let semantic_hits = self.semantic_search(&sentences, mode);

        let mut verdicts = Vec::with_capacity(sentences.len());
        let mut direct = 0usize;
        let mut paraphrased = 0usize;
        let mut ai_paraphrased = 0usize;
        let mut original = 0usize;

        for (i, sentence) in sentences.iter().enumerate() {
            let lexical = self
                .context
                .lexical
                .as_ref()
                .map(|index| index.score(sentence));
            let lexical_score = lexical.as_ref().map(|l| l.score).unwrap_or(0.0);

            let hit = semantic_hits.as_ref().map(|hits| hits[i]);
            let semantic_score = hit.map(|h| h.score.clamp(0.0, 1.0)).unwrap_or(0.0);

            // Cheap rules first; the classifier only sees sentences the
            // lexical and semantic rules left unclaimed.
            let mut classifier_probability = None;
            let mut classification = classify(lexical_score, semantic_score, None, &thresholds);
            if classification.match_type == MatchType::Original
                && thresholds.is_ambiguous(semantic_score)
            {
                classifier_probability =
                    self.maybe_classify(sentence, hit, semantic_score, &thresholds);
                if classifier_probability.is_some() {
                    classification = classify(
                        lexical_score,
                        semantic_score,
                        classifier_probability,
                        &thresholds,
                    );
                }
            }

            match classification.match_type {
                MatchType::DirectMatch => direct += 1,
                MatchType::Paraphrased => paraphrased += 1,
                MatchType::AiParaphrased => ai_paraphrased += 1,
                MatchType::Original => original += 1,
            }

            let best_match = self.best_match(
                &classification,
                lexical.as_ref().map(|l| l.source_id.as_str()),
                lexical_score,
                hit,
                semantic_score,
                classifier_probability,
            );

            verdicts.push(SentenceVerdict {
                text: sentence.clone(),
                flagged: classification.match_type.is_flagged(),
                match_type: classification.match_type,
                deciding_layer: classification.deciding_layer,
                best_match,
            });
        }

        let stats = ReportStats::from_counts(direct, paraphrased, ai_paraphrased, original);
        let flagged = direct + paraphrased + ai_paraphrased;
        let overall_score = round2(flagged as f64 / sentences.len() as f64 * 100.0);

        info!(
            sentences = sentences.len(),
            flagged, overall_score, "Analysis complete"
        );

        AnalysisReport {
            overall_score,
            sentence_verdicts: verdicts,
            stats,
            full_text: text.to_string(),
        }
    }

    /// Layer 2: one best hit per sentence, or `None` when the layer is
    /// skipped (fast mode, layer disabled) or fails at runtime.
    fn semantic_search(&self, sentences: &[String], mode: AnalysisMode) -> Option<Vec<SearchHit>> {
        if mode == AnalysisMode::Fast || !self.context.availability.semantic {
            return None;
        }
        let index = self.context.semantic.as_ref()?;

        let refs: Vec<&str> = sentences.iter().map(String::as_str).collect();
        let embeddings = match self.context.encoder.encode_batch(&refs) {
            Ok(embeddings) => embeddings,
            Err(e) => {
                warn!(error = %e, "Sentence encoding failed, continuing without semantic evidence");
                return None;
            }
        };

        match index.search_batch(&embeddings) {
            Ok(hits) => Some(hits),
            Err(e) => {
                warn!(error = %e, "Semantic search failed, continuing without semantic evidence");
                None
            }
        }
    }

    /// Layer 3: invoked only for sentences in the ambiguous band with a
    /// loaded classifier and a resolvable candidate. Any failure is scoped
    /// to the sentence.
    fn maybe_classify(
        &self,
        sentence: &str,
        hit: Option<SearchHit>,
        semantic_score: f32,
        thresholds: &Thresholds,
    ) -> Option<f32> {
        if !thresholds.is_ambiguous(semantic_score) {
            return None;
        }
        if !self.context.availability.classifier {
            return None;
        }
        let candidate = self.context.corpus.get(hit?.row)?;

        match self.context.classifier.predict(sentence, &candidate.text) {
            Ok(probability) => Some(probability),
            Err(e) => {
                warn!(error = %e, "Classifier failed for sentence, proceeding without Layer 3");
                None
            }
        }
    }

    /// Candidate recorded on a flagged verdict.
    ///
    /// The snippet always prefers the semantic hit's corpus sentence when
    /// one exists, even for lexically decided verdicts; without a hit the
    /// lexical source id is all the evidence there is.
    fn best_match(
        &self,
        classification: &Classification,
        lexical_source: Option<&str>,
        lexical_score: f32,
        hit: Option<SearchHit>,
        semantic_score: f32,
        classifier_probability: Option<f32>,
    ) -> Option<MatchCandidate> {
        let layer = classification.deciding_layer?;
        let entry = hit.and_then(|h| self.context.corpus.get(h.row));

        let (score, source_id) = match layer {
            DetectionLayer::Lexical => {
                (lexical_score, lexical_source.unwrap_or_default().to_string())
            }
            DetectionLayer::Semantic | DetectionLayer::LexicalSemantic => (
                semantic_score.max(lexical_score),
                entry
                    .map(|e| e.source_id.clone())
                    .or_else(|| lexical_source.map(str::to_string))
                    .unwrap_or_default(),
            ),
            DetectionLayer::Classifier => (
                classifier_probability.unwrap_or(semantic_score),
                entry.map(|e| e.source_id.clone()).unwrap_or_default(),
            ),
        };

        let snippet = match entry {
            Some(entry) => entry.snippet(SNIPPET_CHARS),
            None => format!("{source_id} (matched document)"),
        };

        Some(MatchCandidate {
            source_id,
            snippet,
            score,
            layer,
        })
    }
}
