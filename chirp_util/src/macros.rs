#[macro_export]
macro_rules! param_value {
    (, $default:ident) => {
        $default
    };
    ($optional:expr, $default:ident) => {
        $optional
    };
}

#[macro_export]
macro_rules! push_param {
    ($params:ident, required, $key:expr, $val:expr) => {
        $params.push(($key, $val.to_string()));
    };
    ($params:ident, optional, $key:expr, $val:expr) => {
        if let Some(value) = &$val {
            $params.push(($key, value.to_string()));
        }
    };
    // Optional text that is trimmed and skipped when blank, like a search box.
    ($params:ident, text, $key:expr, $val:expr) => {
        if let Some(value) = $val.as_deref().map(str::trim).filter(|value| !value.is_empty()) {
            $params.push(($key, value.to_string()));
        }
    };
}

/// Builds the `(key, value)` query pairs of a request.
/// Keys are taken from the identifiers, so json-server style keys like `_page` work as is.
/// ```
/// use chirp_util::build_params;
///
/// let page = 2;
/// let q: Option<String> = Some("  rust ".to_string());
/// let username: Option<&str> = None;
/// let params = build_params! {
///     required _sort => "timestamp",
///     required _page => page,
///     text q => q,
///     optional username,
/// };
/// assert_eq!(
///     params,
///     vec![
///         ("_sort".to_string(), "timestamp".to_string()),
///         ("_page".to_string(), "2".to_string()),
///         ("q".to_string(), "rust".to_string()),
///     ]
/// );
/// ```
#[macro_export]
macro_rules! build_params {
    (
        $(
            $kind:ident $name:ident $( => $val:expr )?
        ),+ $(,)?
    ) => {
        {
            let mut params: Vec<(String, String)> = Vec::new();
            $(
                $crate::push_param!(
                    params,
                    $kind,
                    stringify!($name).to_string(),
                    $crate::param_value!($( $val )?, $name)
                );
            )+
            params
        }
    };
}
