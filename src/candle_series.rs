use crate::candle::Candle;
use crate::error::{AnalysisError, AnalysisOutcome};
use std::fmt::Display;

/// 캔들 형식 문제
///
/// 엔진은 입력이 정상이라고 가정하므로 이 문제들은 오류가 아니라
/// 로그로 남기는 경고입니다.
#[derive(Debug, Clone, PartialEq)]
pub enum CandleIssue {
    /// low ≤ min(open, close) ≤ max(open, close) ≤ high 위반
    InvertedRange { index: usize },
    /// 음수 거래량
    NegativeVolume { index: usize },
    /// 이전 캔들보다 이른 시작 시간
    OutOfOrder { index: usize },
    /// NaN 또는 무한대 값
    NonFinite { index: usize },
}

impl Display for CandleIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandleIssue::InvertedRange { index } => write!(f, "캔들 #{}: OHLC 범위 역전", index),
            CandleIssue::NegativeVolume { index } => write!(f, "캔들 #{}: 음수 거래량", index),
            CandleIssue::OutOfOrder { index } => write!(f, "캔들 #{}: 시간 순서 위반", index),
            CandleIssue::NonFinite { index } => write!(f, "캔들 #{}: 유한하지 않은 값", index),
        }
    }
}

/// 시간 순으로 정렬된 비어 있지 않은 캔들 시퀀스
///
/// 가장 오래된 캔들이 인덱스 0, 가장 최근 캔들이 마지막에 위치합니다.
/// 생성 이후에는 변경되지 않습니다.
#[derive(Debug, Clone)]
pub struct CandleSeries<C: Candle> {
    items: Vec<C>,
}

impl<C> CandleSeries<C>
where
    C: Candle,
{
    /// 새로운 CandleSeries 인스턴스를 생성합니다.
    ///
    /// # Arguments
    /// * `items` - 시간 순으로 정렬된 캔들 목록
    ///
    /// # Returns
    /// * `AnalysisOutcome<CandleSeries<C>>` - 빈 목록이면 `NoData`
    pub fn new(items: Vec<C>) -> AnalysisOutcome<CandleSeries<C>> {
        if items.is_empty() {
            return Err(AnalysisError::NoData);
        }
        Ok(CandleSeries { items })
    }

    /// 슬라이스를 복제하여 시리즈 생성
    pub fn from_slice(items: &[C]) -> AnalysisOutcome<CandleSeries<C>> {
        Self::new(items.to_vec())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 항상 false (빈 시리즈는 생성할 수 없음)
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 모든 캔들 슬라이스
    pub fn items(&self) -> &[C] {
        &self.items
    }

    /// 가장 최근 캔들
    pub fn last(&self) -> &C {
        // new()에서 비어 있지 않음을 보장
        &self.items[self.items.len() - 1]
    }

    /// 최근 `n`개 캔들을 반환합니다.
    ///
    /// 시리즈가 `n`보다 짧으면 모든 캔들을 반환합니다.
    ///
    /// # Arguments
    /// * `n` - 윈도우 크기
    ///
    /// # Returns
    /// * `&[C]` - 최근 `min(n, len)`개 캔들
    pub fn tail(&self, n: usize) -> &[C] {
        let start = self.items.len().saturating_sub(n);
        if n > self.items.len() {
            log::debug!("윈도우 축소: 요청 {}개, 사용 가능 {}개", n, self.items.len());
        }
        &self.items[start..]
    }

    /// 종가 목록
    pub fn closes(&self) -> Vec<f64> {
        self.items.iter().map(|c| c.close_price()).collect()
    }

    /// 캔들 형식 문제 목록을 반환합니다.
    ///
    /// # Returns
    /// * `Vec<CandleIssue>` - 발견된 문제 (정상이면 빈 목록)
    pub fn issues(&self) -> Vec<CandleIssue> {
        let mut issues = Vec::new();

        for (index, candle) in self.items.iter().enumerate() {
            let values = [
                candle.open_price(),
                candle.high_price(),
                candle.low_price(),
                candle.close_price(),
                candle.volume(),
            ];
            let out_of_order = index > 0 && candle.open_time() < self.items[index - 1].open_time();

            if values.iter().any(|v| !v.is_finite()) {
                issues.push(CandleIssue::NonFinite { index });
                if out_of_order {
                    issues.push(CandleIssue::OutOfOrder { index });
                }
                continue;
            }

            let body_low = candle.open_price().min(candle.close_price());
            let body_high = candle.open_price().max(candle.close_price());
            if candle.low_price() > body_low || body_high > candle.high_price() {
                issues.push(CandleIssue::InvertedRange { index });
            }

            if candle.volume() < 0.0 {
                issues.push(CandleIssue::NegativeVolume { index });
            }

            if out_of_order {
                issues.push(CandleIssue::OutOfOrder { index });
            }
        }

        issues
    }
}
