// src/macros.rs
#[macro_export]
macro_rules! s {
    // String shorthand!

    // Zero-arg → String::new()
    () => {
        ::std::string::String::new()
    };
    // Any single expression: works for literals, consts, or vars
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

#[macro_export]
macro_rules! sel {
    // Parsed-once CSS selector. Only ever fed string literals, so a parse
    // failure is a typo in this crate, not bad input from the portal.
    ($css:literal) => {{
        static SELECTOR: ::std::sync::LazyLock<::scraper::Selector> =
            ::std::sync::LazyLock::new(|| {
                ::scraper::Selector::parse($css).expect(concat!("invalid selector: ", $css))
            });
        &*SELECTOR
    }};
}
