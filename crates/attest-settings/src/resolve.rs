use crate::{CONFIG_SCHEMA_V1, model::AttestConfigV1, presets};
use anyhow::Context;
use attest_engine::RunOptions;
use attest_labels::Evaluator;
use camino::Utf8PathBuf;
use std::time::Duration;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub label_filter: Option<String>,
    pub timeout: Option<String>,
    pub abort_on_failure: Option<bool>,
    pub output_dir: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub profile: String,
    /// Filter with `all` expanded; always compiles.
    pub label_filter: String,
    pub evaluator: Evaluator,
    pub timeout: Duration,
    pub abort_on_failure: bool,
    pub output_dir: Utf8PathBuf,
    pub junit: bool,
    pub sanitize_claim: bool,
    pub summary: bool,
}

impl ResolvedConfig {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            timeout: self.timeout,
            abort_on_failure: self.abort_on_failure,
        }
    }
}

pub fn resolve_config(cfg: AttestConfigV1, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != CONFIG_SCHEMA_V1
    {
        anyhow::bail!("unsupported config schema: {schema} (expected {CONFIG_SCHEMA_V1})");
    }

    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| presets::PROFILE_FULL.to_string());

    let preset = presets::preset(&profile)
        .with_context(|| format!("unknown profile: {profile} (expected full|common|quick)"))?;

    let raw_filter = overrides
        .label_filter
        .clone()
        .or(cfg.label_filter.clone())
        .unwrap_or(preset.label_filter);
    if raw_filter.trim().is_empty() {
        anyhow::bail!("label filter must not be empty");
    }
    let label_filter = attest_labels::expand_filter(&raw_filter);
    let evaluator = attest_labels::compile(&label_filter)
        .with_context(|| format!("invalid label filter: {raw_filter}"))?;

    let timeout = match overrides.timeout.clone().or(cfg.timeout.clone()) {
        Some(t) => parse_duration(&t).with_context(|| format!("invalid timeout: {t}"))?,
        None => preset.timeout,
    };

    let output_dir = overrides
        .output_dir
        .clone()
        .or(cfg.output_dir.clone())
        .unwrap_or_else(|| "results".to_string());

    Ok(ResolvedConfig {
        profile: preset.profile,
        label_filter,
        evaluator,
        timeout,
        abort_on_failure: overrides
            .abort_on_failure
            .or(cfg.abort_on_failure)
            .unwrap_or(false),
        output_dir: Utf8PathBuf::from(output_dir),
        junit: cfg.junit.unwrap_or(true),
        sanitize_claim: cfg.sanitize_claim.unwrap_or(false),
        summary: cfg.summary.unwrap_or(false),
    })
}

/// Parse `90s`, `30m`, `24h`, `1h30m` or a plain number of seconds.
pub fn parse_duration(v: &str) -> anyhow::Result<Duration> {
    let v = v.trim();
    if v.is_empty() {
        anyhow::bail!("empty duration");
    }
    if v.bytes().all(|b| b.is_ascii_digit()) {
        let secs: u64 = v.parse().context("duration out of range")?;
        return non_zero(Duration::from_secs(secs));
    }

    let mut total: u64 = 0;
    let mut digits = String::new();
    for ch in v.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        let unit = match ch {
            'h' => 3600,
            'm' => 60,
            's' => 1,
            other => anyhow::bail!("unknown duration unit: {other} (expected h|m|s)"),
        };
        if digits.is_empty() {
            anyhow::bail!("missing number before '{ch}'");
        }
        let n: u64 = digits.parse().context("duration out of range")?;
        total = n
            .checked_mul(unit)
            .and_then(|s| total.checked_add(s))
            .context("duration out of range")?;
        digits.clear();
    }
    if !digits.is_empty() {
        anyhow::bail!("missing unit after {digits}");
    }
    non_zero(Duration::from_secs(total))
}

fn non_zero(d: Duration) -> anyhow::Result<Duration> {
    if d.is_zero() {
        anyhow::bail!("duration must be greater than zero");
    }
    Ok(d)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(cfg: AttestConfigV1) -> anyhow::Result<ResolvedConfig> {
        resolve_config(cfg, Overrides::default())
    }

    #[test]
    fn defaults_to_full_profile() {
        let r = resolve(AttestConfigV1::default()).unwrap();
        assert_eq!(r.profile, "full");
        assert_eq!(r.label_filter, "common,extended,faredge,telco");
        assert_eq!(r.timeout, Duration::from_secs(24 * 3600));
        assert!(!r.abort_on_failure);
        assert_eq!(r.output_dir, "results");
        assert!(r.junit);
        assert!(!r.sanitize_claim);
        assert!(!r.summary);
    }

    #[test]
    fn quick_profile_shortens_timeout() {
        let cfg = AttestConfigV1 {
            profile: Some("quick".into()),
            ..AttestConfigV1::default()
        };
        let r = resolve(cfg).unwrap();
        assert_eq!(r.label_filter, "common");
        assert_eq!(r.timeout, Duration::from_secs(3600));
    }

    #[test]
    fn overrides_beat_file_values() {
        let cfg = AttestConfigV1 {
            label_filter: Some("telco".into()),
            timeout: Some("2h".into()),
            output_dir: Some("out".into()),
            abort_on_failure: Some(false),
            ..AttestConfigV1::default()
        };
        let overrides = Overrides {
            label_filter: Some("common && !telco".into()),
            timeout: Some("90s".into()),
            output_dir: Some("elsewhere".into()),
            abort_on_failure: Some(true),
            ..Overrides::default()
        };
        let r = resolve_config(cfg, overrides).unwrap();
        assert_eq!(r.label_filter, "common && !telco");
        assert_eq!(r.timeout, Duration::from_secs(90));
        assert_eq!(r.output_dir, "elsewhere");
        assert!(r.abort_on_failure);
        assert_eq!(r.run_options().timeout, Duration::from_secs(90));
    }

    #[test]
    fn file_values_beat_preset() {
        let cfg = AttestConfigV1 {
            profile: Some("common".into()),
            label_filter: Some("extended".into()),
            ..AttestConfigV1::default()
        };
        let r = resolve(cfg).unwrap();
        assert!(r.evaluator.eval(&["extended"]));
        assert!(!r.evaluator.eval(&["common"]));
    }

    #[test]
    fn unknown_profile_is_rejected() {
        let cfg = AttestConfigV1 {
            profile: Some("paranoid".into()),
            ..AttestConfigV1::default()
        };
        let err = resolve(cfg).unwrap_err();
        assert!(err.to_string().contains("unknown profile: paranoid"));
    }

    #[test]
    fn unknown_schema_is_rejected() {
        let cfg = AttestConfigV1 {
            schema: Some("attest.config.v9".into()),
            ..AttestConfigV1::default()
        };
        assert!(resolve(cfg).is_err());
    }

    #[test]
    fn malformed_filter_fails_resolution() {
        let cfg = AttestConfigV1 {
            label_filter: Some("common &&".into()),
            ..AttestConfigV1::default()
        };
        let err = resolve(cfg).unwrap_err();
        assert!(format!("{err:#}").contains("invalid label filter"));
    }

    #[test]
    fn blank_filter_is_rejected() {
        let overrides = Overrides {
            label_filter: Some("   ".into()),
            ..Overrides::default()
        };
        assert!(resolve_config(AttestConfigV1::default(), overrides).is_err());
    }

    #[test]
    fn durations_parse() {
        assert_eq!(parse_duration("90s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("30m").unwrap(), Duration::from_secs(1800));
        assert_eq!(parse_duration("24h").unwrap(), Duration::from_secs(86400));
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("3600").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration(" 5m ").unwrap(), Duration::from_secs(300));
    }

    #[test]
    fn bad_durations_fail() {
        for bad in ["", "0", "0s", "h", "10d", "10m5", "1.5h", "-3s"] {
            assert!(parse_duration(bad).is_err(), "{bad:?} should fail");
        }
    }
}
