use log::{debug, error, info};
use market_signal::OhlcvCandle;
use market_signal::analyzer::MarketAnalyzer;
use market_signal::config_loader::{AnalysisConfig, ConfigFormat, ConfigLoader};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

struct Args {
    candles_path: PathBuf,
    symbol: String,
    timeframe: String,
    config_path: Option<PathBuf>,
}

fn print_usage(program: &str) {
    println!(
        "사용법: {} <캔들_JSON_파일> [--symbol 심볼] [--timeframe 간격] [--config 설정_파일]",
        program
    );
    println!("캔들 파일은 캔들 객체 배열 또는 Binance kline 배열이어야 합니다.");
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut candles_path = None;
    let mut symbol = "BTCUSDT".to_string();
    let mut timeframe = "1h".to_string();
    let mut config_path = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--symbol" => {
                symbol = iter.next().ok_or("--symbol 값이 없습니다")?.clone();
            }
            "--timeframe" => {
                timeframe = iter.next().ok_or("--timeframe 값이 없습니다")?.clone();
            }
            "--config" => {
                config_path = Some(PathBuf::from(
                    iter.next().ok_or("--config 값이 없습니다")?,
                ));
            }
            other if candles_path.is_none() => candles_path = Some(PathBuf::from(other)),
            other => return Err(format!("알 수 없는 인수: {}", other)),
        }
    }

    Ok(Args {
        candles_path: candles_path.ok_or("캔들 파일 경로가 필요합니다")?,
        symbol,
        timeframe,
        config_path,
    })
}

fn run(args: Args) -> Result<(), String> {
    let config = match &args.config_path {
        Some(path) => {
            debug!("사용자 지정 설정 파일 사용: {}", path.display());
            ConfigLoader::load_from_file::<AnalysisConfig>(path, ConfigFormat::Auto)?
        }
        None => AnalysisConfig::default(),
    };

    let content = std::fs::read_to_string(&args.candles_path).map_err(|e| {
        format!(
            "캔들 파일 읽기 실패: {} - {}",
            args.candles_path.display(),
            e
        )
    })?;
    let candles = OhlcvCandle::parse_many(&content)?;
    info!("캔들 {}개 로드: {}", candles.len(), args.candles_path.display());

    let analyzer = MarketAnalyzer::new(config)?;
    let result = analyzer.analyze(&args.symbol, &args.timeframe, &candles)?;
    let json = result
        .to_json_pretty()
        .map_err(|e| format!("결과 직렬화 실패: {}", e))?;
    println!("{}", json);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("analyze_candles");

    let parsed = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(msg) => {
            error!("{}", msg);
            print_usage(program);
            return ExitCode::FAILURE;
        }
    };

    match run(parsed) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            error!("분석 실패: {}", msg);
            eprintln!("{}", msg);
            ExitCode::FAILURE
        }
    }
}
