use crate::error::AnalysisError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Debug, Display};

/// 분석 엔진이 사용하는 캔들 인터페이스
///
/// 외부 데이터 수집기가 만든 캔들 타입이 이 트레이트만 구현하면
/// 엔진은 별도 변환 없이 해당 캔들로 분석을 수행합니다.
pub trait Candle: Clone + Debug + Display + Send + Sync {
    fn open_time(&self) -> DateTime<Utc>;
    fn close_time(&self) -> DateTime<Utc>;
    fn open_price(&self) -> f64;
    fn high_price(&self) -> f64;
    fn low_price(&self) -> f64;
    fn close_price(&self) -> f64;
    fn volume(&self) -> f64;

    /// 대표 가격 (고가 + 저가 + 종가) / 3
    fn typical_price(&self) -> f64 {
        (self.high_price() + self.low_price() + self.close_price()) / 3.0
    }
}

/// OHLCV 캔들
///
/// `openTime`/`closeTime`은 RFC 3339 문자열 또는 epoch 밀리초 정수로 읽습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OhlcvCandle {
    #[serde(deserialize_with = "flexible_time::deserialize")]
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    #[serde(deserialize_with = "flexible_time::deserialize")]
    pub close_time: DateTime<Utc>,
}

mod flexible_time {
    use chrono::{DateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTime {
        Millis(i64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawTime::deserialize(deserializer)? {
            RawTime::Millis(ms) => DateTime::<Utc>::from_timestamp_millis(ms)
                .ok_or_else(|| D::Error::custom(format!("타임스탬프 범위 초과: {}", ms))),
            RawTime::Text(text) => DateTime::parse_from_rfc3339(&text)
                .map(|time| time.with_timezone(&Utc))
                .map_err(D::Error::custom),
        }
    }
}

impl Display for OhlcvCandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Candle(t={}, o={}, h={}, l={}, c={}, v={})",
            self.open_time.to_rfc3339(),
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume
        )
    }
}

impl Candle for OhlcvCandle {
    fn open_time(&self) -> DateTime<Utc> {
        self.open_time
    }
    fn close_time(&self) -> DateTime<Utc> {
        self.close_time
    }
    fn open_price(&self) -> f64 {
        self.open
    }
    fn high_price(&self) -> f64 {
        self.high
    }
    fn low_price(&self) -> f64 {
        self.low
    }
    fn close_price(&self) -> f64 {
        self.close
    }
    fn volume(&self) -> f64 {
        self.volume
    }
}

impl OhlcvCandle {
    /// Binance kline 배열 한 행을 캔들로 변환
    ///
    /// 행 형식: `[openTime(ms), open, high, low, close, volume, closeTime(ms), ...]`
    /// 가격과 거래량은 문자열 또는 숫자 모두 허용합니다.
    ///
    /// # Arguments
    /// * `row` - kline 행 JSON 값
    ///
    /// # Returns
    /// * `Result<OhlcvCandle, AnalysisError>` - 변환된 캔들 또는 `InvalidKline` 오류
    pub fn from_kline(row: &Value) -> Result<OhlcvCandle, AnalysisError> {
        let fields = row
            .as_array()
            .ok_or_else(|| AnalysisError::InvalidKline(format!("배열이 아닌 kline 행: {}", row)))?;

        if fields.len() < 7 {
            return Err(AnalysisError::InvalidKline(format!(
                "kline 필드 부족: {}개 (최소 7개 필요)",
                fields.len()
            )));
        }

        Ok(OhlcvCandle {
            open_time: kline_time(&fields[0], "openTime")?,
            open: kline_number(&fields[1], "open")?,
            high: kline_number(&fields[2], "high")?,
            low: kline_number(&fields[3], "low")?,
            close: kline_number(&fields[4], "close")?,
            volume: kline_number(&fields[5], "volume")?,
            close_time: kline_time(&fields[6], "closeTime")?,
        })
    }

    /// 캔들 JSON 문서 파싱
    ///
    /// 캔들 객체 배열 또는 Binance kline 행 배열을 모두 받아들입니다.
    pub fn parse_many(content: &str) -> Result<Vec<OhlcvCandle>, AnalysisError> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| AnalysisError::InvalidKline(format!("JSON 파싱 실패: {}", e)))?;

        let rows = value
            .as_array()
            .ok_or_else(|| AnalysisError::InvalidKline("최상위 값이 배열이 아닙니다".to_string()))?;

        rows.iter()
            .map(|row| {
                if row.is_array() {
                    OhlcvCandle::from_kline(row)
                } else {
                    serde_json::from_value(row.clone())
                        .map_err(|e| AnalysisError::InvalidKline(format!("캔들 객체 파싱 실패: {}", e)))
                }
            })
            .collect()
    }
}

fn kline_number(value: &Value, name: &str) -> Result<f64, AnalysisError> {
    let parsed = match value {
        Value::String(s) => s.parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.ok_or_else(|| AnalysisError::InvalidKline(format!("{} 값이 숫자가 아님: {}", name, value)))
}

fn kline_time(value: &Value, name: &str) -> Result<DateTime<Utc>, AnalysisError> {
    value
        .as_i64()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .ok_or_else(|| AnalysisError::InvalidKline(format!("{} 타임스탬프 오류: {}", name, value)))
}
