#[macro_export]
macro_rules! test {
    (@base $( #[$attr:meta] ),*$func:ident, $input:expr, $output:expr, $options:expr) => {
        $(#[$attr])*
        #[test]
        #[allow(non_snake_case)]
        fn $func() {
            let css = stylet::from_string($input.to_string(), &$options)
                .expect(concat!("failed to compile ", $input));
            assert_eq!(String::from($output), css);
        }
    };
    ($( #[$attr:meta] ),*$func:ident, $input:expr, $output:expr, $options:expr) => {
        test!(@base $(#[$attr])* $func, $input, $output, $options);
    };
    ($( #[$attr:meta] ),*$func:ident, $input:expr, $output:expr) => {
        test!(@base $(#[$attr])* $func, $input, $output, stylet::Options::default());
    };
}

/// Verify that compilation fails and the rendered error mentions the
/// expected fragment.
#[macro_export]
macro_rules! error {
    ($( #[$attr:meta] ),*$func:ident, $input:expr, $err:expr) => {
        $(#[$attr])*
        #[test]
        #[allow(non_snake_case)]
        fn $func() {
            match stylet::from_string($input.to_string(), &stylet::Options::default()) {
                Ok(css) => panic!("expected failure, compiled to {:?}", css),
                Err(e) => {
                    let rendered = e.to_string();
                    assert!(
                        rendered.contains($err),
                        "expected error containing {:?}, got {:?}",
                        $err,
                        rendered
                    );
                }
            }
        }
    };
}
