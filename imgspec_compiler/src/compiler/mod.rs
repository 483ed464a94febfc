//! Image check clause compiler
//!
//! Turns the ordered parameters of one clause into an [`ImageCheckSpec`].
//! Parameters are applied in order: `file` and the filter keys accumulate,
//! every other key overwrites what an earlier occurrence set. The first
//! failing parameter aborts compilation; there are no partial results.

mod error;
mod filters;
mod geometry;
mod integer;
mod keys;

pub use error::{CompileError, CompileResult};
pub use filters::parse_image_filter;
pub use geometry::parse_rect;
pub use integer::parse_integer_parameter;
pub use keys::ClauseKey;

use crate::config::compile_time::compiler::{MAX_FILTERS_PER_CHAIN, MAX_PARAMETERS_PER_CLAUSE};
use crate::config::CompilerDefaults;
use crate::logging::codes;
use crate::spec::{ErrorRate, FilterChain, FilterOp, ImageCheckSpec, Rect};
use crate::syntax::{split_parameters, Parameter};
use crate::{log_debug, log_error, log_success};

/// Working state while a clause's parameters are applied
#[derive(Debug, Clone)]
pub struct SpecAccumulator {
    image_paths: Vec<String>,
    error_rate: ErrorRate,
    tolerance: u32,
    analyze_offset: Option<u32>,
    stretch: bool,
    crop_if_outside: bool,
    selected_area: Option<Rect>,
    original_filters: Vec<FilterOp>,
    sample_filters: Vec<FilterOp>,
    map_filters: Vec<FilterOp>,
}

impl SpecAccumulator {
    pub fn new(defaults: &CompilerDefaults) -> Self {
        Self {
            image_paths: Vec::new(),
            error_rate: defaults.error_rate,
            tolerance: defaults.tolerance,
            analyze_offset: None,
            stretch: false,
            crop_if_outside: false,
            selected_area: None,
            original_filters: Vec::new(),
            sample_filters: Vec::new(),
            map_filters: Vec::new(),
        }
    }

    /// Apply one parameter, resolving relative image paths against `context_path`
    pub fn apply(
        mut self,
        parameter: &Parameter,
        context_path: Option<&str>,
    ) -> CompileResult<Self> {
        let key = ClauseKey::from_key(&parameter.key).ok_or_else(|| {
            CompileError::UnknownParameter {
                key: parameter.key.clone(),
            }
        })?;
        let value = parameter.value.as_str();

        match key {
            ClauseKey::File => self.image_paths.push(resolve_image_path(context_path, value)),
            ClauseKey::Error => self.error_rate = value.parse()?,
            ClauseKey::Tolerance => {
                self.tolerance = parse_integer_parameter(key.as_str(), value)?;
            }
            ClauseKey::AnalyzeOffset => {
                self.analyze_offset = Some(parse_integer_parameter(key.as_str(), value)?);
            }
            ClauseKey::Stretch => self.stretch = true,
            ClauseKey::CropIfOutside => self.crop_if_outside = true,
            ClauseKey::Area => self.selected_area = Some(parse_rect(value)?),
            ClauseKey::Filter | ClauseKey::FilterA | ClauseKey::FilterB | ClauseKey::MapFilter => {
                let filter = parse_image_filter(value)?;
                for chain in key.filter_targets() {
                    self.push_filter(*chain, filter)?;
                }
            }
        }

        Ok(self)
    }

    fn push_filter(&mut self, chain: FilterChain, filter: FilterOp) -> CompileResult<()> {
        let filters = match chain {
            FilterChain::Original => &mut self.original_filters,
            FilterChain::Sample => &mut self.sample_filters,
            FilterChain::Map => &mut self.map_filters,
        };
        if filters.len() >= MAX_FILTERS_PER_CHAIN {
            return Err(CompileError::LimitExceeded {
                what: "filters per chain",
                limit: MAX_FILTERS_PER_CHAIN,
            });
        }
        filters.push(filter);
        Ok(())
    }

    /// Build the finished `ImageCheckSpec`; a clause without any `file` parameter is rejected
    pub fn finish(self) -> CompileResult<ImageCheckSpec> {
        if self.image_paths.is_empty() {
            return Err(CompileError::NoImagesDefined);
        }

        Ok(ImageCheckSpec {
            image_paths: self.image_paths,
            error_rate: self.error_rate,
            tolerance: self.tolerance,
            analyze_offset: self.analyze_offset,
            stretch: self.stretch,
            crop_if_outside: self.crop_if_outside,
            selected_area: self.selected_area,
            original_filters: self.original_filters,
            sample_filters: self.sample_filters,
            map_filters: self.map_filters,
        })
    }
}

/// An empty context counts as no context
fn resolve_image_path(context_path: Option<&str>, value: &str) -> String {
    match context_path.filter(|context| !context.is_empty()) {
        Some(context) if context.ends_with('/') => format!("{}{}", context, value),
        Some(context) => format!("{}/{}", context, value),
        None => value.to_string(),
    }
}

/// Compile already-split parameters
pub fn compile_parameters(
    parameters: &[Parameter],
    context_path: Option<&str>,
    defaults: &CompilerDefaults,
) -> CompileResult<ImageCheckSpec> {
    log_debug!("Compiling image check",
        "parameters" => parameters.len(),
        "context_path" => context_path.unwrap_or("<none>")
    );

    let result = compile_inner(parameters, context_path, defaults);

    match &result {
        Ok(spec) => {
            log_success!(
                codes::success::CLAUSE_COMPILED,
                "Image check compiled",
                "image_paths" => spec.image_paths.len(),
                "filters" => spec.total_filters()
            );
        }
        Err(e) => {
            log_error!(e.error_code(), &e.to_string(), span = e.span());
        }
    }

    result
}

/// A clause without any `file` key always reports `NoImagesDefined`, even
/// when it also exceeds a compilation limit.
fn compile_inner(
    parameters: &[Parameter],
    context_path: Option<&str>,
    defaults: &CompilerDefaults,
) -> CompileResult<ImageCheckSpec> {
    match fold_parameters(parameters, context_path, defaults) {
        Err(CompileError::LimitExceeded { .. }) if !declares_image(parameters) => {
            Err(CompileError::NoImagesDefined)
        }
        result => result,
    }
}

fn fold_parameters(
    parameters: &[Parameter],
    context_path: Option<&str>,
    defaults: &CompilerDefaults,
) -> CompileResult<ImageCheckSpec> {
    // SECURITY: Bound parameter count before doing any per-parameter work
    if parameters.len() > MAX_PARAMETERS_PER_CLAUSE {
        return Err(CompileError::LimitExceeded {
            what: "parameters",
            limit: MAX_PARAMETERS_PER_CLAUSE,
        });
    }

    parameters
        .iter()
        .try_fold(SpecAccumulator::new(defaults), |acc, parameter| {
            acc.apply(parameter, context_path)
        })?
        .finish()
}

fn declares_image(parameters: &[Parameter]) -> bool {
    parameters
        .iter()
        .any(|parameter| ClauseKey::from_key(&parameter.key) == Some(ClauseKey::File))
}

/// Split and compile one clause, e.g. `file: shot.png, tolerance: 5, stretch`
pub fn compile_clause(
    text: &str,
    context_path: Option<&str>,
    defaults: &CompilerDefaults,
) -> CompileResult<ImageCheckSpec> {
    let parameters = split_parameters(text).map_err(|e| {
        let e = CompileError::from(e);
        log_error!(e.error_code(), &e.to_string(), span = e.span());
        e
    })?;
    compile_parameters(&parameters, context_path, defaults)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::LexerError;
    use crate::spec::ErrorRateError;
    use crate::syntax::SplitError;
    use assert_matches::assert_matches;

    fn defaults() -> CompilerDefaults {
        CompilerDefaults::builtin()
    }

    fn compile(text: &str) -> CompileResult<ImageCheckSpec> {
        compile_clause(text, None, &defaults())
    }

    #[test]
    fn test_end_to_end_with_context_path() {
        let spec = compile_clause(
            "file: shot.png, tolerance: 5, stretch, area: 10 20 100 50, \
             filter-a: contrast 20, filter-b: blur 2",
            Some("/specs"),
            &defaults(),
        )
        .unwrap();

        assert_eq!(spec.image_paths, vec!["/specs/shot.png"]);
        assert_eq!(spec.tolerance, 5);
        assert!(spec.stretch);
        assert!(!spec.crop_if_outside);
        assert_eq!(spec.selected_area, Some(Rect::new(10, 20, 100, 50)));
        assert_eq!(spec.original_filters, vec![FilterOp::Contrast(20)]);
        assert_eq!(spec.sample_filters, vec![FilterOp::Blur(2)]);
        assert!(spec.map_filters.is_empty());
        assert_eq!(spec.error_rate, defaults().error_rate);
        assert_eq!(spec.analyze_offset, None);
    }

    #[test]
    fn test_defaults_seed_the_spec() {
        let custom = CompilerDefaults::new(ErrorRate::pixels(300.0), 7);
        let spec = compile_clause("file: a.png", None, &custom).unwrap();

        assert_eq!(spec.error_rate, ErrorRate::pixels(300.0));
        assert_eq!(spec.tolerance, 7);
        assert!(!spec.stretch);
        assert_eq!(spec.selected_area, None);
        assert_eq!(spec.total_filters(), 0);
    }

    #[test]
    fn test_every_file_key_adds_a_path() {
        let spec = compile("file: a.png, file: b.png, file: c.png").unwrap();
        assert_eq!(spec.image_paths, vec!["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn test_context_path_joining() {
        assert_eq!(resolve_image_path(Some("/specs"), "a.png"), "/specs/a.png");
        assert_eq!(resolve_image_path(Some("/specs/"), "a.png"), "/specs/a.png");
        assert_eq!(resolve_image_path(Some(""), "a.png"), "a.png");
        assert_eq!(resolve_image_path(None, "a.png"), "a.png");
    }

    #[test]
    fn test_no_images_defined() {
        assert_matches!(compile(""), Err(CompileError::NoImagesDefined));
        assert_matches!(
            compile("tolerance: 3, stretch, area: 0 0 10 10, filter: blur 1, error: 2%"),
            Err(CompileError::NoImagesDefined)
        );
    }

    #[test]
    fn test_filter_applies_to_original_and_sample() {
        let spec = compile(
            "file: a.png, filter-a: contrast 1, filter: blur 2, filter-b: denoise 3, \
             map-filter: saturation 4, filter: quantinize 5",
        )
        .unwrap();

        assert_eq!(
            spec.original_filters,
            vec![FilterOp::Contrast(1), FilterOp::Blur(2), FilterOp::Quantinize(5)]
        );
        assert_eq!(
            spec.sample_filters,
            vec![FilterOp::Blur(2), FilterOp::Denoise(3), FilterOp::Quantinize(5)]
        );
        assert_eq!(spec.map_filters, vec![FilterOp::Saturation(4)]);
    }

    #[test]
    fn test_filter_truncation() {
        let spec = compile("file: a.png, filter: blur 3.9, map-filter: blur -3.9").unwrap();
        assert_eq!(spec.original_filters, vec![FilterOp::Blur(3)]);
        assert_eq!(spec.map_filters, vec![FilterOp::Blur(-3)]);
    }

    #[test]
    fn test_later_values_overwrite() {
        let spec = compile(
            "tolerance: 1, file: a.png, tolerance: 9, error: 1%, error: 40px, \
             area: 1 1 1 1, area: 2 2 2 2, analyze-offset: 3, analyze-offset: 0",
        )
        .unwrap();

        assert_eq!(spec.tolerance, 9);
        assert_eq!(spec.error_rate, ErrorRate::pixels(40.0));
        assert_eq!(spec.selected_area, Some(Rect::new(2, 2, 2, 2)));
        assert_eq!(spec.analyze_offset, Some(0));
    }

    #[test]
    fn test_flags_ignore_their_value() {
        let spec = compile("file: a.png, stretch: no, crop-if-outside: false").unwrap();
        assert!(spec.stretch);
        assert!(spec.crop_if_outside);
    }

    #[test]
    fn test_invalid_integer_parameters() {
        assert_matches!(
            compile("file: a.png, tolerance: 12abc"),
            Err(CompileError::InvalidInteger { field, value }) if field == "tolerance" && value == "12abc"
        );
        assert_matches!(
            compile("file: a.png, tolerance: -5"),
            Err(CompileError::InvalidInteger { .. })
        );
        assert_matches!(
            compile("file: a.png, tolerance: 3000000000"),
            Err(CompileError::InvalidInteger { value, .. }) if value == "3000000000"
        );
        assert_matches!(
            compile("file: a.png, analyze-offset: "),
            Err(CompileError::InvalidInteger { field, .. }) if field == "analyze-offset"
        );
    }

    #[test]
    fn test_unknown_parameter() {
        assert_matches!(
            compile("file: a.png, foo: bar"),
            Err(CompileError::UnknownParameter { key }) if key == "foo"
        );
    }

    #[test]
    fn test_first_failure_wins() {
        assert_matches!(
            compile("foo: bar, filter: sharpen 1"),
            Err(CompileError::UnknownParameter { .. })
        );
        assert_matches!(
            compile("filter: sharpen 1, foo: bar"),
            Err(CompileError::UnknownFilter { name }) if name == "sharpen"
        );
    }

    #[test]
    fn test_nested_errors_propagate_unchanged() {
        assert_matches!(
            compile("file: a.png, area: 1 2 3"),
            Err(CompileError::Lexer(LexerError::MissingNumber { .. }))
        );
        assert_matches!(
            compile("file: a.png, error: lots"),
            Err(CompileError::ErrorRate(ErrorRateError::MissingUnit { .. }))
        );
        assert_matches!(
            compile(r#"file: "a.png"#),
            Err(CompileError::Split(SplitError::UnterminatedQuote { .. }))
        );
    }

    #[test]
    fn test_compile_is_idempotent_and_order_sensitive() {
        let text = "file: a.png, filter: blur 1, filter: contrast 2";
        assert_eq!(compile(text).unwrap(), compile(text).unwrap());

        let swapped = compile("file: a.png, filter: contrast 2, filter: blur 1").unwrap();
        assert_ne!(compile(text).unwrap(), swapped);
    }

    #[test]
    fn test_compile_parameters_directly() {
        let parameters = vec![
            Parameter::new("file", "x.png"),
            Parameter::flag("crop-if-outside"),
        ];
        let spec = compile_parameters(&parameters, Some("dir"), &defaults()).unwrap();
        assert_eq!(spec.image_paths, vec!["dir/x.png"]);
        assert!(spec.crop_if_outside);
    }

    #[test]
    fn test_limits() {
        let mut too_many = vec![Parameter::new("file", "a.png")];
        too_many.extend((0..MAX_PARAMETERS_PER_CLAUSE).map(|_| Parameter::flag("stretch")));
        assert_matches!(
            compile_parameters(&too_many, None, &defaults()),
            Err(CompileError::LimitExceeded { limit, .. }) if limit == MAX_PARAMETERS_PER_CLAUSE
        );

        let mut filters = vec![Parameter::new("file", "a.png")];
        filters.extend((0..=MAX_FILTERS_PER_CHAIN).map(|_| Parameter::new("map-filter", "blur 1")));
        assert_matches!(
            compile_parameters(&filters, None, &defaults()),
            Err(CompileError::LimitExceeded { limit, .. }) if limit == MAX_FILTERS_PER_CHAIN
        );
    }

    #[test]
    fn test_missing_images_reported_over_limits() {
        let flags: Vec<Parameter> = (0..1100).map(|_| Parameter::flag("stretch")).collect();
        assert_matches!(
            compile_parameters(&flags, None, &defaults()),
            Err(CompileError::NoImagesDefined)
        );

        let filters: Vec<Parameter> = (0..=MAX_FILTERS_PER_CHAIN)
            .map(|_| Parameter::new("filter", "blur 1"))
            .collect();
        assert_matches!(
            compile_parameters(&filters, None, &defaults()),
            Err(CompileError::NoImagesDefined)
        );
    }

    #[test]
    fn test_image_paths_are_unbounded() {
        let text = (0..300)
            .map(|i| format!("file: {}.png", i))
            .collect::<Vec<_>>()
            .join(", ");
        let spec = compile(&text).unwrap();

        assert_eq!(spec.image_paths.len(), 300);
        assert_eq!(spec.image_paths[299], "299.png");
    }
}
