use crate::domain::{BookOverdue, LibraryEvent};

use super::errors::Result;
use super::library_service::LibraryService;

/// 延滞検出バッチ
///
/// 定期的に外部から実行され、延滞している貸出ごとに "book-overdue" を発行する。
/// コアの業務操作からは呼ばれない。
///
/// ビジネスルール：
/// - 会員種別の料金戦略で料金が発生している貸出を延滞とする
/// - 状態は変更しない（通知のみ）
///
/// # 戻り値
/// 延滞として通知した貸出の件数
pub async fn detect_overdue_loans(service: &LibraryService) -> Result<usize> {
    let mut detected_count = 0;

    for member in service.list_members().await? {
        for loan in member.loans() {
            if service.fine_for_loan(&member, loan)? == 0 {
                continue;
            }

            service
                .dependencies()
                .event_publisher
                .publish(LibraryEvent::BookOverdue(BookOverdue {
                    member_id: member.id(),
                    book_id: loan.book_id,
                }));

            detected_count += 1;
        }
    }

    tracing::info!(detected_count, "overdue detection finished");
    Ok(detected_count)
}
