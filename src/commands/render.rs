use anyhow::{Result, anyhow};
use rand::{SeedableRng, rngs::StdRng};

use chorobind::{
    AggregateClient, ColorStrategy, Engine, OfflineClient, QueryParams, RandomHex, Range,
    ThresholdScale, write_layer_svg,
};

use crate::cli::{Cli, RenderArgs, Strategy};

use super::open_source;

pub fn run(cli: &Cli, args: &RenderArgs) -> Result<()> {
    let source = open_source(&args.source, args.stats.as_deref())?;
    let client = open_client(args.stats.as_deref())?;
    let strategy = pick_strategy(args);

    let mut engine = Engine::new(source, client).with_strategy(strategy);
    if let Some(count) = args.fallback {
        engine = engine.with_synthetic_fallback(count);
    }
    if !args.tooltip_fields.is_empty() {
        engine = engine.with_tooltip_fields(args.tooltip_fields.clone());
    }
    if let Some(disname) = &args.disname {
        engine.params_mut().disname = disname.clone();
    }
    apply_filters(engine.params_mut(), args);

    if cli.verbose > 0 {
        eprintln!("[render] dataset={} -> {}", args.dataset, args.output.display());
    }

    engine.select(&args.dataset)?;
    if cli.verbose > 0 {
        let n = engine.layer().map(|layer| layer.len()).unwrap_or(0);
        eprintln!("[render] loaded {n} features");
    }

    if !engine.fetch() {
        eprintln!("[render] no statistics applied; rendering the neutral layer");
    } else if cli.verbose > 0 {
        eprintln!("[render] legend has {} entries", engine.legend().len());
    }

    let layer = engine.layer().ok_or_else(|| anyhow!("no feature layer loaded"))?;
    write_layer_svg(&args.output, layer, engine.legend(), args.width, args.margin)?;

    if cli.verbose > 0 {
        eprintln!("[render] wrote {}", args.output.display());
    }

    Ok(())
}

fn apply_filters(params: &mut QueryParams, args: &RenderArgs) {
    for (spec, slot) in [
        (&args.min, &mut params.min),
        (&args.max, &mut params.max),
        (&args.avg, &mut params.avg),
        (&args.sum, &mut params.sum),
    ] {
        if let Some(spec) = spec {
            slot.name = spec.field.clone();
            slot.range = Range::new(spec.low, spec.high);
        }
    }
    if let Some(count) = args.count {
        params.count = Range::new(count.low, count.high);
    }
}

fn open_client(stats: Option<&str>) -> Result<Box<dyn AggregateClient>> {
    match stats {
        Some(base) => {
            #[cfg(feature = "remote")]
            {
                return Ok(Box::new(chorobind::HttpAggregateClient::new(base)));
            }
            #[cfg(not(feature = "remote"))]
            {
                let _ = base;
                anyhow::bail!("built without the `remote` feature; drop --stats");
            }
        }
        None => Ok(Box::new(OfflineClient)),
    }
}

fn pick_strategy(args: &RenderArgs) -> Box<dyn ColorStrategy> {
    match (args.strategy, args.seed) {
        (Strategy::Random, Some(seed)) => {
            Box::new(RandomHex::with_rng(StdRng::seed_from_u64(seed)))
        }
        (Strategy::Random, None) => Box::new(RandomHex::new()),
        (Strategy::Threshold, _) => Box::new(ThresholdScale::default()),
    }
}
