use crate::candle::Candle;
use crate::candle_series::CandleSeries;
use crate::error::{AnalysisError, AnalysisOutcome};
use crate::indicator::TABuilder;
use crate::indicator::utils::{trailing_mean, true_ranges};
use std::fmt::Display;
use std::marker::PhantomData;

/// ATR 단일 값
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ATR {
    /// 계산 기간
    pub period: usize,
    /// ATR 값
    pub value: f64,
}

impl Display for ATR {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ATR({}: {:.2})", self.period, self.value)
    }
}

/// ATR 계산을 위한 빌더
///
/// Wilder 평활화가 아닌 최근 `period`개 True Range의 단순 평균을 사용합니다.
/// True Range가 하나도 없으면 (캔들 1개) ATR은 0입니다.
#[derive(Debug)]
pub struct ATRBuilder<C: Candle> {
    /// ATR 계산 기간
    period: usize,
    _phantom: PhantomData<C>,
}

impl<C: Candle> ATRBuilder<C> {
    /// 새 ATR 빌더 생성
    ///
    /// # Panics
    /// * 기간이 0이면 패닉 발생
    pub fn new(period: usize) -> ATRBuilder<C> {
        if period == 0 {
            panic!("ATR 기간은 0보다 커야 합니다");
        }

        ATRBuilder {
            period,
            _phantom: PhantomData,
        }
    }

    fn compute(&self, data: &[C]) -> ATR {
        let trs = true_ranges(data);
        if trs.len() < self.period {
            log::debug!("ATR 윈도우 축소: TR {}개로 계산 (기간 {})", trs.len(), self.period);
        }

        ATR {
            period: self.period,
            value: trailing_mean(&trs, self.period),
        }
    }
}

impl<C: Candle> TABuilder<ATR, C> for ATRBuilder<C> {
    fn from_series(&mut self, series: &CandleSeries<C>) -> ATR {
        self.compute(series.items())
    }

    fn build(&mut self, data: &[C]) -> AnalysisOutcome<ATR> {
        if data.is_empty() {
            return Err(AnalysisError::NoData);
        }
        Ok(self.compute(data))
    }
}
