#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use lending_library::adapters::clock::FixedClock;
use lending_library::adapters::in_memory::{BookRepository, EventBus, MemberRepository};
use lending_library::application::library::{LibraryService, ServiceDependencies};
use lending_library::domain::{
    BOOK_ADDED, BOOK_OVERDUE, BOOK_RETURNED, FineStrategies, FlatRateFineCalculator,
    LibraryEvent, Member, MemberId, PremiumFineCalculator,
};
use lending_library::ports::MemberRepository as MemberRepositoryTrait;
use lending_library::ports::member_repository::Result as MemberResult;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// テスト用のライブラリ一式
///
/// インメモリのリポジトリと固定時刻で組み立てたサービス。
/// 発行されたイベントはすべて `events` に記録される。
pub struct TestLibrary {
    pub service: LibraryService,
    pub clock: Arc<FixedClock>,
    pub event_bus: Arc<EventBus>,
    pub events: Arc<Mutex<Vec<LibraryEvent>>>,
}

impl TestLibrary {
    /// 記録済みイベントのうち指定名のもの
    pub fn events_named(&self, name: &str) -> Vec<LibraryEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.name() == name)
            .cloned()
            .collect()
    }
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
}

/// 一般会員: 日額10・猶予14日、プレミアム会員: 日額5・猶予20日
pub fn default_strategies() -> FineStrategies {
    FineStrategies::standard(
        FlatRateFineCalculator::new(10, 14),
        PremiumFineCalculator::new(5, 20),
    )
}

pub fn setup_library() -> TestLibrary {
    setup_library_with_members(Arc::new(MemberRepository::new()))
}

/// 会員リポジトリを差し替えて組み立てる
pub fn setup_library_with_members(
    member_repository: Arc<dyn MemberRepositoryTrait>,
) -> TestLibrary {
    let clock = Arc::new(FixedClock::new(start_time()));
    let event_bus = Arc::new(EventBus::new());
    let events = Arc::new(Mutex::new(Vec::new()));

    for name in [BOOK_ADDED, BOOK_RETURNED, BOOK_OVERDUE] {
        let sink = Arc::clone(&events);
        event_bus.subscribe(name, move |event| {
            sink.lock().unwrap().push(event.clone());
            Ok(())
        });
    }

    let service_deps = ServiceDependencies {
        book_repository: Arc::new(BookRepository::new()),
        member_repository,
        event_publisher: event_bus.clone(),
        clock: clock.clone(),
    };

    TestLibrary {
        service: LibraryService::new(service_deps, default_strategies()),
        clock,
        event_bus,
        events,
    }
}

/// 書き込みを失敗させられる会員リポジトリ
///
/// `fail_writes` を立てると `add` がエラーを返す。読み取りは常に成功する。
#[derive(Default)]
pub struct FailingMemberRepository {
    inner: MemberRepository,
    fail_writes: AtomicBool,
}

impl FailingMemberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl MemberRepositoryTrait for FailingMemberRepository {
    async fn add(&self, member: Member) -> MemberResult<Member> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err("member store unavailable".into());
        }
        self.inner.add(member).await
    }

    async fn delete(&self, id: MemberId) -> MemberResult<()> {
        self.inner.delete(id).await
    }

    async fn find_by_id(&self, id: MemberId) -> MemberResult<Option<Member>> {
        self.inner.find_by_id(id).await
    }

    async fn list(&self) -> MemberResult<Vec<Member>> {
        self.inner.list().await
    }
}
