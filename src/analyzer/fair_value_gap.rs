use crate::candle::Candle;
use crate::candle_series::CandleSeries;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt::Display;

/// Fair Value Gap 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FVGDirection {
    /// 불리시 FVG (상승 갭)
    Bullish,
    /// 베어리시 FVG (하락 갭)
    Bearish,
}

impl Display for FVGDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FVGDirection::Bullish => write!(f, "bullish"),
            FVGDirection::Bearish => write!(f, "bearish"),
        }
    }
}

/// 가장 최근의 Fair Value Gap
///
/// 모든 갭을 모으지 않고 최신 갭 하나만 보고합니다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FairValueGap {
    /// 갭 없음
    Absent,
    /// 갭 발견
    Present {
        direction: FVGDirection,
        /// (하단, 상단)
        range: (f64, f64),
        /// 갭을 만든 (두 번째) 캔들 인덱스
        candle_index: usize,
    },
}

impl FairValueGap {
    /// 최신 캔들부터 과거 방향으로 인접 쌍을 검사해 첫 번째 갭을 반환합니다.
    ///
    /// * `cur.low > prev.high` → 불리시, 범위 `(prev.high, cur.low)`
    /// * `cur.high < prev.low` → 베어리시, 범위 `(cur.high, prev.low)`
    ///
    /// # Arguments
    /// * `data` - 시간 순 캔들 슬라이스
    ///
    /// # Returns
    /// * `FairValueGap` - 가장 최근 갭 또는 `Absent`
    pub fn detect<C: Candle>(data: &[C]) -> FairValueGap {
        for i in (1..data.len()).rev() {
            let prev = &data[i - 1];
            let cur = &data[i];

            if cur.low_price() > prev.high_price() {
                return FairValueGap::Present {
                    direction: FVGDirection::Bullish,
                    range: (prev.high_price(), cur.low_price()),
                    candle_index: i,
                };
            } else if cur.high_price() < prev.low_price() {
                return FairValueGap::Present {
                    direction: FVGDirection::Bearish,
                    range: (cur.high_price(), prev.low_price()),
                    candle_index: i,
                };
            }
        }

        FairValueGap::Absent
    }

    /// 시리즈에서 갭 탐지
    pub fn from_series<C: Candle>(series: &CandleSeries<C>) -> FairValueGap {
        Self::detect(series.items())
    }

    pub fn exists(&self) -> bool {
        matches!(self, FairValueGap::Present { .. })
    }
}

// `{"exists": false}` 또는 `{"exists": true, "direction": .., "range": [lo, hi], "index": i}`
impl Serialize for FairValueGap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FairValueGap::Absent => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("exists", &false)?;
                map.end()
            }
            FairValueGap::Present {
                direction,
                range,
                candle_index,
            } => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("exists", &true)?;
                map.serialize_entry("direction", direction)?;
                map.serialize_entry("range", &[range.0, range.1])?;
                map.serialize_entry("index", candle_index)?;
                map.end()
            }
        }
    }
}
