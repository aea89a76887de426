use regex::Regex;

/// Expand environment variables in a string using ${VAR_NAME} syntax.
/// Unknown variables are left as written.
pub fn expand_env_var_in_string(value: &str, env: &dyn Fn(&str) -> Option<String>) -> String {
    let Ok(re) = Regex::new(r"\$\{([^}]+)\}") else {
        return value.to_string();
    };

    re.replace_all(value, |caps: &regex::Captures| {
        env(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}
