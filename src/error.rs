/// 분석 오류
///
/// 엔진 자체가 치명적으로 취급하는 조건은 `NoData` 하나뿐입니다.
/// 윈도우 축소, 거래량 0, ATR 0 등은 대체값으로 처리되며 오류가 아닙니다.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// 캔들 데이터 없음
    NoData,
    /// kline 입력 변환 실패
    InvalidKline(String),
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::NoData => write!(f, "No candle data"),
            AnalysisError::InvalidKline(msg) => write!(f, "kline 변환 오류: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

/// String으로 AnalysisError 변환
impl From<AnalysisError> for String {
    fn from(err: AnalysisError) -> Self {
        err.to_string()
    }
}

/// 분석 결과 타입
pub type AnalysisOutcome<T> = Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(AnalysisError::NoData.to_string(), "No candle data");
        let msg: String = AnalysisError::InvalidKline("x".to_string()).into();
        assert!(msg.contains("x"));
    }
}
