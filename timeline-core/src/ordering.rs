use crate::event::Dated;
use crate::properties::TimeRange;

/// Sắp xếp tăng dần theo thời gian. Sắp xếp ổn định: sự kiện trùng mốc giữ thứ tự thêm vào.
pub fn sort_events<E: Dated>(events: &mut [E]) {
    events.sort_by_key(|event| event.date());
}

/// Khoảng thời gian nhỏ nhất bao mọi sự kiện, `None` nếu danh sách rỗng.
pub fn min_max_times<E: Dated>(events: &[E]) -> Option<TimeRange> {
    let mut iter = events.iter();
    let mut range = TimeRange::at(iter.next()?.date());
    for event in iter {
        range.include(event.date());
    }
    Some(range)
}
