use metrics_exporter_prometheus::PrometheusHandle;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use report_comments::comments::{BankRegistry, CommentService, Variant};
use report_comments::config::AppConfig;
use report_comments::error::AppError;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads `COMMENT_BANK_DIR` when configured, otherwise the banks compiled into the binary.
pub(crate) fn load_banks(config: &AppConfig) -> Result<BankRegistry, AppError> {
    let registry = match &config.bank_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "loading statement banks from directory");
            BankRegistry::from_dir(dir)?
        }
        None => BankRegistry::embedded()?,
    };
    Ok(registry)
}

pub(crate) fn build_service(
    config: &AppConfig,
) -> Result<Arc<CommentService<BankRegistry>>, AppError> {
    let registry = load_banks(config)?;
    Ok(Arc::new(CommentService::new(
        Arc::new(registry),
        config.generation,
    )))
}

/// Seeded runs repeat exactly; unseeded runs draw from the OS.
pub(crate) fn command_rng(seed: Option<u64>) -> ChaCha8Rng {
    seed.map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64)
}

pub(crate) fn parse_variant(raw: &str) -> Result<Variant, String> {
    let number = raw
        .trim()
        .parse::<u8>()
        .map_err(|_| format!("failed to parse '{raw}' as a variant number"))?;
    Variant::try_from(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn variant_flag_accepts_one_or_two() {
        assert_eq!(parse_variant("1"), Ok(Variant::First));
        assert_eq!(parse_variant(" 2 "), Ok(Variant::Second));
        assert!(parse_variant("3").is_err());
        assert!(parse_variant("two").is_err());
    }

    #[test]
    fn seeded_rng_repeats() {
        let first: u64 = command_rng(Some(5)).gen();
        let second: u64 = command_rng(Some(5)).gen();
        assert_eq!(first, second);
    }
}
