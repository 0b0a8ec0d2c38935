use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, VecDeque};

/// 기본 최대 항목 수
pub const DEFAULT_MAX_ITEMS: usize = 20;

/// 기본 유효 시간 (15분)
pub fn default_ttl() -> Duration {
    Duration::minutes(15)
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: DateTime<Utc>,
}

/// 심볼별 요약 캐시
///
/// 최대 크기를 초과하면 가장 먼저 삽입된 항목이 제거되고 (FIFO),
/// 유효 시간이 지난 항목은 조회되지 않습니다.
/// 분석 엔진은 이 캐시를 사용하지 않으며, 외부 요약 계층이 소유해서 씁니다.
/// 시각은 호출자가 넘겨주므로 내부에 시계를 두지 않습니다.
#[derive(Debug, Clone)]
pub struct InsightCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    /// 삽입 순서 (오래된 것이 앞)
    order: VecDeque<String>,
    pub max_items: usize,
    pub ttl: Duration,
}

impl<V: Clone> Default for InsightCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITEMS, default_ttl())
    }
}

impl<V: Clone> InsightCache<V> {
    /// 새 캐시 생성
    ///
    /// # Arguments
    /// * `max_items` - 최대 항목 수 (0이면 1로 취급)
    /// * `ttl` - 항목 유효 시간
    pub fn new(max_items: usize, ttl: Duration) -> InsightCache<V> {
        InsightCache {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_items: max_items.max(1),
            ttl,
        }
    }

    /// 유효한 항목 조회
    ///
    /// # Arguments
    /// * `symbol` - 키
    /// * `now` - 현재 시각
    ///
    /// # Returns
    /// * `Option<V>` - 유효 시간 내의 값
    pub fn get(&self, symbol: &str, now: DateTime<Utc>) -> Option<V> {
        self.entries
            .get(symbol)
            .filter(|entry| now - entry.inserted_at < self.ttl)
            .map(|entry| entry.value.clone())
    }

    /// 항목 저장
    ///
    /// 같은 키가 있으면 값과 시각을 갱신하되 삽입 순서는 유지합니다.
    /// 새 키이고 캐시가 가득 찼으면 가장 오래 삽입된 항목을 제거합니다.
    /// 기존 키 갱신은 항목 수를 늘리지 않으므로, 캐시가 가득 차 있어도 다른 항목을 제거하지 않습니다.
    pub fn insert(&mut self, symbol: &str, value: V, now: DateTime<Utc>) {
        let entry = CacheEntry {
            value,
            inserted_at: now,
        };

        if let Some(existing) = self.entries.get_mut(symbol) {
            *existing = entry;
            return;
        }

        while self.entries.len() >= self.max_items {
            match self.order.pop_front() {
                Some(oldest) => {
                    log::debug!("캐시 가득 참, 가장 오래된 항목 제거: {}", oldest);
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }

        self.order.push_back(symbol.to_string());
        self.entries.insert(symbol.to_string(), entry);
    }

    /// 만료된 항목 정리
    ///
    /// # Returns
    /// * `usize` - 제거된 항목 수
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| now - entry.inserted_at < ttl);
        let entries = &self.entries;
        self.order.retain(|key| entries.contains_key(key));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
