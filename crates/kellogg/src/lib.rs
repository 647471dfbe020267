//! Kellogg - Reed-Kellogg sentence diagrams.
//!
//! Layout and rendering for sentences an upstream parser has already
//! analysed. A sentence arrives as a constituency tree (plus optional
//! dependency rows) and leaves as an SVG diagram, or as a DOT description of
//! its dependency graph.

pub mod config;
pub mod dependency;
pub mod layout;

mod error;
mod export;
mod style;

pub use kellogg_core::{color, draw, geometry, grammar};
pub use kellogg_parser::{ParsedSentence, SentenceParser, TreebankParser};

pub use error::{KelloggError, SentenceFailure};
pub use style::DiagramStyle;

use log::{debug, info, trace, warn};

use kellogg_core::draw::TextMetrics;

use config::AppConfig;
use dependency::DependencyGraph;
use export::{Exporter, svg::SvgExporter};
use layout::Diagram;

/// Document format of a rendered diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Dot,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Dot => "dot",
        }
    }
}

/// A finished diagram document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDiagram {
    format: OutputFormat,
    content: String,
}

impl RenderedDiagram {
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }
}

/// The result for one sentence of a document.
#[derive(Debug)]
pub struct SentenceOutcome {
    /// The sentence block as it appeared in the document.
    pub sentence: String,
    pub result: Result<RenderedDiagram, KelloggError>,
}

/// Builder for parsing, laying out and rendering sentence diagrams.
///
/// # Examples
///
/// ```rust,no_run
/// use kellogg::{DiagramBuilder, config::AppConfig};
///
/// let source = "(S (NP (DT The) (NN cat)) (VP (VBD sat)))";
///
/// // With custom config
/// let config = AppConfig::default();
/// let builder = DiagramBuilder::new(config);
///
/// // Parse, lay out and render in one step
/// let diagram = builder
///     .generate_diagram(source, "reed-kellogg")
///     .expect("Failed to render");
/// println!("{}", diagram.content());
///
/// // Or use default config
/// let builder = DiagramBuilder::default();
/// ```
pub struct DiagramBuilder {
    config: AppConfig,
    metrics: Box<dyn TextMetrics>,
    parser: Box<dyn SentenceParser + Send + Sync>,
}

impl Default for DiagramBuilder {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    ///
    /// Sentences are read with [`TreebankParser`] unless another parser is
    /// supplied through [`with_parser`](Self::with_parser).
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including layout and style settings
    pub fn new(config: AppConfig) -> Self {
        let metrics = config.text().build_metrics();
        Self {
            config,
            metrics,
            parser: Box::new(TreebankParser),
        }
    }

    /// Replaces the sentence parser.
    pub fn with_parser(mut self, parser: impl SentenceParser + Send + Sync + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse one sentence.
    ///
    /// # Errors
    ///
    /// Returns [`KelloggError::InvalidInput`] for blank input and
    /// [`KelloggError::Parse`] when the parser rejects the sentence.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use kellogg::DiagramBuilder;
    ///
    /// let builder = DiagramBuilder::default();
    /// let sentence = builder
    ///     .parse("(S (NP (PRP I)) (VP (VBP run)))")
    ///     .expect("Failed to parse sentence");
    /// assert_eq!(sentence.text(), "I run");
    /// ```
    pub fn parse(&self, source: &str) -> Result<ParsedSentence, KelloggError> {
        if source.trim().is_empty() {
            return Err(KelloggError::InvalidInput(
                "please enter a valid sentence".to_string(),
            ));
        }

        info!("Parsing sentence");
        let sentence = self
            .parser
            .parse(source)
            .map_err(|err| KelloggError::new_parse_error(err, source))?;

        debug!(text = sentence.text().as_str(); "Sentence parsed successfully");
        trace!(sentence:?; "Parsed sentence");
        Ok(sentence)
    }

    /// Lay out a parsed sentence as a Reed-Kellogg diagram.
    ///
    /// `source` is the text the sentence was parsed from; structural errors
    /// point into it.
    ///
    /// # Errors
    ///
    /// Returns [`KelloggError::Structural`] when the tree is missing a
    /// category the layout requires.
    pub fn layout_reed_kellogg(
        &self,
        sentence: &ParsedSentence,
        source: &str,
    ) -> Result<Diagram, KelloggError> {
        info!("Laying out Reed-Kellogg diagram");
        let diagram = layout::layout_reed_kellogg(
            sentence.tree(),
            self.config.layout(),
            self.metrics.as_ref(),
        )
        .map_err(|err| KelloggError::new_structural_error(err, source))?;

        info!(
            width = diagram.width(),
            height = diagram.height(),
            primitives = diagram.primitives().len();
            "Layout calculated"
        );
        Ok(diagram)
    }

    /// Build the dependency graph of a parsed sentence.
    ///
    /// # Errors
    ///
    /// Returns [`KelloggError::MissingDependencies`] when the sentence has
    /// no dependency rows.
    pub fn layout_dependency(
        &self,
        sentence: &ParsedSentence,
    ) -> Result<DependencyGraph, KelloggError> {
        info!("Building dependency graph");
        DependencyGraph::from_tokens(sentence.dependencies())
    }

    /// Render a laid-out diagram to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`KelloggError::Export`] when the style configuration cannot
    /// be applied.
    pub fn render_svg(&self, diagram: &Diagram) -> Result<String, KelloggError> {
        let exporter = SvgExporter::new(&self.config)?;
        Ok(exporter.export_diagram(diagram)?)
    }

    /// Turn one sentence into a finished document.
    ///
    /// `style` is checked before anything is parsed.
    ///
    /// # Errors
    ///
    /// Returns [`KelloggError::UnsupportedStyle`] for a style other than
    /// `reed-kellogg` or `dependency`, and otherwise any error of the
    /// individual stages.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use kellogg::{DiagramBuilder, OutputFormat};
    ///
    /// let builder = DiagramBuilder::default();
    /// let diagram = builder
    ///     .generate_diagram("(S (NP (PRP I)) (VP (VBP run)))", "reed-kellogg")
    ///     .expect("Failed to render");
    /// assert_eq!(diagram.format(), OutputFormat::Svg);
    /// ```
    pub fn generate_diagram(
        &self,
        source: &str,
        style: &str,
    ) -> Result<RenderedDiagram, KelloggError> {
        let style: DiagramStyle = style.parse()?;
        self.render_sentence(source, style)
    }

    /// Turn every sentence block of a document into a document of its own.
    ///
    /// Blocks are separated by blank lines. One sentence failing does not
    /// stop the others; each outcome carries its own result.
    ///
    /// # Errors
    ///
    /// Fails as a whole only for an unsupported style or a document without
    /// any sentence.
    pub fn generate_batch(
        &self,
        document: &str,
        style: &str,
    ) -> Result<Vec<SentenceOutcome>, KelloggError> {
        let style: DiagramStyle = style.parse()?;
        let blocks = kellogg_parser::split_sentences(document);
        if blocks.is_empty() {
            return Err(KelloggError::InvalidInput(
                "please enter a valid sentence".to_string(),
            ));
        }

        info!(sentences = blocks.len(), style:%; "Processing document");
        let outcomes: Vec<SentenceOutcome> = blocks
            .into_iter()
            .enumerate()
            .map(|(index, block)| {
                let result = self.render_sentence(block, style);
                if let Err(err) = &result {
                    warn!(sentence = index + 1, err:%; "Sentence failed");
                }
                SentenceOutcome {
                    sentence: block.to_string(),
                    result,
                }
            })
            .collect();
        Ok(outcomes)
    }

    fn render_sentence(
        &self,
        source: &str,
        style: DiagramStyle,
    ) -> Result<RenderedDiagram, KelloggError> {
        let sentence = self.parse(source)?;
        match style {
            DiagramStyle::ReedKellogg => {
                let diagram = self.layout_reed_kellogg(&sentence, source)?;
                Ok(RenderedDiagram {
                    format: OutputFormat::Svg,
                    content: self.render_svg(&diagram)?,
                })
            }
            DiagramStyle::Dependency => {
                let graph = self.layout_dependency(&sentence)?;
                Ok(RenderedDiagram {
                    format: OutputFormat::Dot,
                    content: graph.to_dot(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_checked_before_parsing() {
        let builder = DiagramBuilder::default();
        let err = builder.generate_diagram("(((", "arc-diagram").unwrap_err();
        assert!(matches!(err, KelloggError::UnsupportedStyle(_)));
    }

    #[test]
    fn test_blank_input_rejected() {
        let builder = DiagramBuilder::default();
        let err = builder.generate_diagram("   \n", "reed-kellogg").unwrap_err();
        assert_eq!(err.to_string(), "please enter a valid sentence");
    }

    #[test]
    fn test_output_extension() {
        assert_eq!(OutputFormat::Svg.extension(), "svg");
        assert_eq!(OutputFormat::Dot.extension(), "dot");
    }
}
