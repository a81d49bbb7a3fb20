macro_rules! assert_formula_error {
    ($result:expr, $kind:pat, $span:expr) => {{
        let error = $result.unwrap_err();
        let formula_error = error
            .formula_error()
            .unwrap_or_else(|| panic!("expected a formula error, got: {error}"));
        assert!(
            matches!(formula_error.kind(), $kind),
            "unexpected error kind: {:?}",
            formula_error.kind()
        );
        assert_eq!(formula_error.span(), miette::SourceSpan::from($span));
    }};
}

pub(crate) use assert_formula_error;

macro_rules! assert_miette_report {
    ($diag:expr, [$($fragment:literal),+ $(,)?]) => {{
        use miette::{GraphicalReportHandler, GraphicalTheme};

        let mut out = String::new();
        GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
            .with_width(80)
            .render_report(&mut out, $diag.unwrap_err().as_ref())
            .unwrap();
        $(
            assert!(out.contains($fragment), "{:?} is missing from the report:\n{out}", $fragment);
        )+
    }};
}

pub(crate) use assert_miette_report;
