// ==========================================
// 电商数据入库 - 命令行入口
// ==========================================
// 配置分层: 默认值 → --config 文件 → 环境变量 → 命令行参数
// 退出码: 仅致命错误（Sink 不可用 / 建表失败 / 源文件不可用）非 0
//         块级失败只记录日志，不影响退出码
// ==========================================

use anyhow::{Context, Result};
use clap::Parser;
use ecommerce_ingest::config::{IngestConfig, TemporalDetection};
use ecommerce_ingest::engine::{run_ingest, RunOutcome, RunSummary};
use ecommerce_ingest::logging;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "ecommerce-ingest")]
#[command(author, version, about = "电商 CSV 数据批量入库 SQLite")]
struct Cli {
    /// JSON 配置文件
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SQLite 数据库文件路径
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// 源文件目录（包含六个实体的 CSV）
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// 每块行数
    #[arg(long)]
    chunk_size: Option<usize>,

    /// 时间列识别方式: name_heuristic / declared
    #[arg(long)]
    temporal_detection: Option<TemporalDetection>,

    /// 字段分隔符（单个 ASCII 字符）
    #[arg(long)]
    delimiter: Option<char>,

    /// 仅输出告警及以上日志
    #[arg(short, long)]
    quiet: bool,

    /// JSON 行格式日志
    #[arg(long, conflicts_with = "quiet")]
    log_json: bool,
}

impl Cli {
    fn build_config(&self) -> Result<IngestConfig> {
        let mut config = match &self.config {
            Some(path) => IngestConfig::from_json_file(path)?,
            None => IngestConfig::default(),
        };
        config.apply_env()?;

        if let Some(path) = &self.database {
            config.database_path = path.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(size) = self.chunk_size {
            config.chunk_size = size;
        }
        if let Some(mode) = self.temporal_detection {
            config.temporal_detection = mode;
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }

        config.validate()?;
        Ok(config)
    }
}

fn report(summary: &RunSummary) {
    for entity in &summary.entities {
        info!(
            entity = entity.entity,
            chunks_loaded = entity.chunks_loaded,
            chunks_failed = entity.chunks_failed,
            rows_loaded = entity.rows_loaded,
            rows_failed = entity.rows_failed,
            rows_skipped = entity.rows_skipped,
            "实体汇总"
        );
    }

    let failed = summary.failed_chunks().count();
    if failed > 0 {
        warn!(run_id = %summary.run_id, failed_chunks = failed, "部分数据块写入失败");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.quiet {
        logging::init_quiet();
    } else if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    let config = cli.build_config().context("配置加载失败")?;
    info!(version = ecommerce_ingest::VERSION, "{} 启动", ecommerce_ingest::APP_NAME);

    match run_ingest(&config).context("加载计划无效")? {
        RunOutcome::Completed(summary) => {
            report(&summary);
            Ok(())
        }
        RunOutcome::Aborted { error, summary } => {
            report(&summary);
            Err(anyhow::Error::new(error).context(format!("运行中止 (run_id: {})", summary.run_id)))
        }
    }
}
