// ==========================================
// 电商数据入库 - 分块读取器
// ==========================================
// 职责: 按固定行数流式读取分隔文本，逐块产出规范化记录
// 流程: 表头规范化 → 逐行读取 → 时间列转换 → NULL 标准化
// 约束:
// - 惰性、有限、不可重启（Iterator + FusedIterator）
// - 列数不一致 / 无法解码的行跳过并告警，不中断分块
// - 读取 I/O 中断时产出一个 Err 后结束
// ==========================================

use crate::config::{IngestConfig, TemporalDetection, DEFAULT_CHUNK_SIZE, DEFAULT_NULL_MARKERS};
use crate::domain::{EntitySchema, FieldType, Record};
use crate::importer::column_normalizer::{looks_temporal, normalize_headers};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use csv::{ReaderBuilder, StringRecord};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::iter::FusedIterator;
use std::path::Path;
use tracing::{debug, warn};

/// 读取选项（由 IngestConfig 派生）
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    pub chunk_size: usize,
    pub delimiter: u8,
    pub temporal_detection: TemporalDetection,
    pub null_markers: Vec<String>,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            delimiter: b',',
            temporal_detection: TemporalDetection::default(),
            null_markers: DEFAULT_NULL_MARKERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl From<&IngestConfig> for ReaderOptions {
    fn from(config: &IngestConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            delimiter: config.delimiter_byte(),
            temporal_detection: config.temporal_detection,
            null_markers: config.null_markers.clone(),
        }
    }
}

/// 单块统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkStats {
    /// 自上一块以来跳过的格式错误行
    pub skipped_rows: usize,
    /// 时间列降级为 NULL 的计数（按列）
    pub temporal_nulls: BTreeMap<String, usize>,
    /// 源文件行号范围（含表头计数，1 起）
    pub first_line: u64,
    pub last_line: u64,
}

impl ChunkStats {
    pub fn total_temporal_nulls(&self) -> usize {
        self.temporal_nulls.values().sum()
    }
}

/// 一个数据块
#[derive(Debug, Clone)]
pub struct Chunk {
    /// 块序号（1 起）
    pub number: usize,
    pub records: Vec<Record>,
    pub stats: ChunkStats,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// 列处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Temporal,
    Typed(Option<FieldType>),
}

#[derive(Debug, Clone)]
struct ColumnPlan {
    name: String,
    kind: ColumnKind,
}

/// 分块读取器
pub struct ChunkReader<R: Read> {
    reader: csv::Reader<R>,
    source: String,
    columns: Vec<ColumnPlan>,
    cleaner: DataCleaner,
    chunk_size: usize,
    next_number: usize,
    skipped_since_last: usize,
    buffer: StringRecord,
    finished: bool,
}

impl ChunkReader<File> {
    /// 打开实体源文件
    pub fn open<P: AsRef<Path>>(
        path: P,
        entity: &EntitySchema,
        options: &ReaderOptions,
    ) -> ImportResult<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();

        if !path.exists() {
            return Err(ImportError::FileNotFound(display));
        }
        let file = File::open(path).map_err(|e| ImportError::read_error(&display, e))?;
        Self::from_reader(file, display, entity, options)
    }
}

impl<R: Read> ChunkReader<R> {
    /// 从任意 Read 构造（source 仅用于日志）
    pub fn from_reader(
        rdr: R,
        source: impl Into<String>,
        entity: &EntitySchema,
        options: &ReaderOptions,
    ) -> ImportResult<Self> {
        if options.chunk_size == 0 {
            return Err(ImportError::InvalidChunkSize);
        }
        let source = source.into();

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(options.delimiter)
            .flexible(true) // 列数校验由本模块处理
            .from_reader(rdr);

        let raw_headers = reader
            .headers()
            .map_err(|e| ImportError::HeaderParseError {
                path: source.clone(),
                message: e.to_string(),
            })?
            .clone();

        let names = normalize_headers(raw_headers.iter());
        let columns: Vec<ColumnPlan> = names
            .into_iter()
            .map(|name| {
                let declared = entity.field(&name).map(|f| f.field_type);
                let temporal = match options.temporal_detection {
                    TemporalDetection::NameHeuristic => looks_temporal(&name),
                    TemporalDetection::Declared => declared == Some(FieldType::Timestamp),
                };
                let kind = if temporal {
                    ColumnKind::Temporal
                } else {
                    ColumnKind::Typed(declared)
                };
                ColumnPlan { name, kind }
            })
            .collect();

        debug!(
            source = %source,
            entity = entity.name,
            columns = ?columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            "表头规范化完成"
        );

        Ok(Self {
            reader,
            source,
            // 空文件没有表头：直接结束
            finished: columns.is_empty(),
            columns,
            cleaner: DataCleaner::new(options.null_markers.iter().cloned()),
            chunk_size: options.chunk_size,
            next_number: 1,
            skipped_since_last: 0,
            buffer: StringRecord::new(),
        })
    }

    /// 规范化后的列名
    pub fn columns(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// 将一行转换为记录（同名列后者覆盖）
    fn build_record(&self, row: &StringRecord, stats: &mut ChunkStats) -> Record {
        let mut record = Record::new();
        for (column, raw) in self.columns.iter().zip(row.iter()) {
            let coerced = match column.kind {
                ColumnKind::Temporal => self.cleaner.coerce_temporal(raw),
                ColumnKind::Typed(field_type) => self.cleaner.coerce_typed(raw, field_type),
            };
            if coerced.degraded {
                *stats.temporal_nulls.entry(column.name.clone()).or_insert(0) += 1;
            }
            record.insert(column.name.clone(), coerced.value);
        }
        record
    }

    fn line_of(&self) -> u64 {
        self.buffer.position().map(|p| p.line()).unwrap_or(0)
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = ImportResult<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut records = Vec::with_capacity(self.chunk_size.min(DEFAULT_CHUNK_SIZE));
        let mut stats = ChunkStats::default();

        while records.len() < self.chunk_size {
            match self.reader.read_record(&mut self.buffer) {
                Ok(false) => {
                    self.finished = true;
                    break;
                }
                Ok(true) => {
                    let line = self.line_of();
                    if self.buffer.len() != self.columns.len() {
                        warn!(
                            source = %self.source,
                            line,
                            expected = self.columns.len(),
                            actual = self.buffer.len(),
                            "列数不一致，跳过该行"
                        );
                        self.skipped_since_last += 1;
                        continue;
                    }

                    if records.is_empty() {
                        stats.first_line = line;
                    }
                    stats.last_line = line;
                    let record = self.build_record(&self.buffer, &mut stats);
                    records.push(record);
                }
                Err(e) if e.is_io_error() => {
                    self.finished = true;
                    return Some(Err(ImportError::read_error(&self.source, e)));
                }
                Err(e) => {
                    // 非 I/O 错误（如非法 UTF-8）只影响当前行
                    warn!(source = %self.source, error = %e, "无法解析的行，跳过");
                    self.skipped_since_last += 1;
                }
            }
        }

        if records.is_empty() {
            if self.skipped_since_last > 0 {
                warn!(
                    source = %self.source,
                    skipped = self.skipped_since_last,
                    "文件末尾仅剩格式错误行"
                );
                self.skipped_since_last = 0;
            }
            return None;
        }

        stats.skipped_rows = std::mem::take(&mut self.skipped_since_last);
        let chunk = Chunk {
            number: self.next_number,
            records,
            stats,
        };
        self.next_number += 1;

        if chunk.stats.total_temporal_nulls() > 0 {
            warn!(
                source = %self.source,
                chunk = chunk.number,
                nulls = chunk.stats.total_temporal_nulls(),
                columns = ?chunk.stats.temporal_nulls,
                "时间列无法解析的值已置为 NULL"
            );
        }

        Some(Ok(chunk))
    }
}

impl<R: Read> FusedIterator for ChunkReader<R> {}
