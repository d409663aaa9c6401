//! Pointer gestures on the timeline.
//!
//! [`DragController`] is either idle or tracking one gesture. Every pointer
//! move recomputes the candidate span from the gesture's anchor and the
//! snapshot taken at pointer-down, never from the previous move, so rounding
//! cannot accumulate.

use scorecard_models::InitiativeId;

use crate::timeline::{clamp_month, month_delta, month_index_from_offset, TimeAxis};

/// An inclusive month range on the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthSpan {
    pub start: u8,
    pub end: u8,
}

impl MonthSpan {
    /// Builds a span, swapping the bounds if needed and clamping to 0-11.
    pub fn new(a: u8, b: u8) -> Self {
        let a = clamp_month(a as i64);
        let b = clamp_month(b as i64);
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn months(&self) -> u8 {
        self.end - self.start + 1
    }

    pub fn contains(&self, month: u8) -> bool {
        (self.start..=self.end).contains(&month)
    }
}

/// What a gesture does to the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Create,
    Move,
    ResizeStart,
    ResizeEnd,
}

/// Part of a bar under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitZone {
    StartHandle,
    Body,
    EndHandle,
}

impl HitZone {
    pub fn drag_kind(self) -> DragKind {
        match self {
            HitZone::StartHandle => DragKind::ResizeStart,
            HitZone::Body => DragKind::Move,
            HitZone::EndHandle => DragKind::ResizeEnd,
        }
    }
}

/// Finds which part of the bar covering `span` lies under `offset`
/// (timeline-relative). Handles take `handle_width` pixels at each end; on a
/// bar too narrow for both, the start handle wins on the left half.
pub fn hit_test(axis: &TimeAxis, handle_width: f64, span: MonthSpan, offset: f64) -> Option<HitZone> {
    let (left, right) = axis.bar_extent(span.start, span.end);
    if offset < left || offset >= right {
        return None;
    }
    let handle = handle_width.min((right - left) / 2.0);
    if offset < left + handle {
        Some(HitZone::StartHandle)
    } else if offset >= right - handle {
        Some(HitZone::EndHandle)
    } else {
        Some(HitZone::Body)
    }
}

/// Shifts both bounds, clamping each independently. A bar pushed past an
/// edge shrinks rather than stopping.
pub fn move_span(original: MonthSpan, delta: i64) -> MonthSpan {
    MonthSpan {
        start: clamp_month(original.start as i64 + delta),
        end: clamp_month(original.end as i64 + delta),
    }
}

/// Moves the start bound; it never passes the end.
pub fn resize_start(original: MonthSpan, delta: i64) -> MonthSpan {
    let start = clamp_month(original.start as i64 + delta).min(original.end);
    MonthSpan {
        start,
        end: original.end,
    }
}

/// Moves the end bound; it never passes the start.
pub fn resize_end(original: MonthSpan, delta: i64) -> MonthSpan {
    let end = clamp_month(original.end as i64 + delta).max(original.start);
    MonthSpan {
        start: original.start,
        end,
    }
}

/// Span between the anchor month and the month under the pointer.
pub fn create_span(anchor: u8, current: u8) -> MonthSpan {
    MonthSpan::new(anchor, current)
}

/// One in-progress gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub initiative_id: InitiativeId,
    pub kind: DragKind,
    /// Timeline offset at pointer-down.
    pub anchor_offset: f64,
    /// Month under the pointer at pointer-down.
    pub anchor_month: u8,
    /// Span before the gesture; `None` for creates.
    pub original: Option<MonthSpan>,
    /// Year carried by emitted updates.
    pub year: i32,
    /// Last span emitted, if the pointer has moved.
    pub last: Option<MonthSpan>,
}

/// Candidate schedule produced by a pointer move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragUpdate {
    pub initiative_id: InitiativeId,
    pub year: i32,
    pub span: MonthSpan,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// The gesture state machine.
#[derive(Debug, Clone)]
pub struct DragController {
    axis: TimeAxis,
    state: DragState,
}

impl DragController {
    pub fn new(axis: TimeAxis) -> Self {
        Self {
            axis,
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.session().is_some()
    }

    /// Starts a move or resize on an existing bar. Ignored while another
    /// gesture is active.
    pub fn begin_bar_drag(
        &mut self,
        initiative_id: InitiativeId,
        zone: HitZone,
        offset: f64,
        original: MonthSpan,
        year: i32,
    ) -> bool {
        if self.is_dragging() {
            return false;
        }
        self.state = DragState::Dragging(DragSession {
            initiative_id,
            kind: zone.drag_kind(),
            anchor_offset: offset,
            anchor_month: month_index_from_offset(offset, self.axis.cell_width),
            original: Some(original),
            year,
            last: None,
        });
        true
    }

    /// Starts drawing a new bar on an unscheduled row. Nothing is emitted
    /// until the pointer moves.
    pub fn begin_create(&mut self, initiative_id: InitiativeId, offset: f64, year: i32) -> bool {
        if self.is_dragging() {
            return false;
        }
        self.state = DragState::Dragging(DragSession {
            initiative_id,
            kind: DragKind::Create,
            anchor_offset: offset,
            anchor_month: month_index_from_offset(offset, self.axis.cell_width),
            original: None,
            year,
            last: None,
        });
        true
    }

    /// Recomputes the candidate span for the pointer at `offset`
    /// (timeline-relative).
    pub fn pointer_move(&mut self, offset: f64) -> Option<DragUpdate> {
        let cell_width = self.axis.cell_width;
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };

        let span = match (session.kind, session.original) {
            (DragKind::Create, _) => {
                create_span(session.anchor_month, month_index_from_offset(offset, cell_width))
            }
            (kind, Some(original)) => {
                let delta = month_delta(offset - session.anchor_offset, cell_width);
                match kind {
                    DragKind::Move => move_span(original, delta),
                    DragKind::ResizeStart => resize_start(original, delta),
                    DragKind::ResizeEnd => resize_end(original, delta),
                    DragKind::Create => return None,
                }
            }
            (_, None) => return None,
        };
        session.last = Some(span);

        Some(DragUpdate {
            initiative_id: session.initiative_id.clone(),
            year: session.year,
            span,
        })
    }

    /// Ends the gesture. The emitted updates stay applied.
    pub fn pointer_up(&mut self) -> Option<DragSession> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    /// Abandons the gesture and returns it so the caller can restore
    /// `original`.
    pub fn cancel(&mut self) -> Option<DragSession> {
        self.pointer_up()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> DragController {
        DragController::new(TimeAxis::default())
    }

    fn span(start: u8, end: u8) -> MonthSpan {
        MonthSpan { start, end }
    }

    fn all_spans() -> impl Iterator<Item = MonthSpan> {
        (0..12u8).flat_map(|s| (s..12u8).map(move |e| span(s, e)))
    }

    #[test]
    fn test_create_drag_to_pixel_250() {
        let mut drag = controller();
        let id = InitiativeId::new();
        assert!(drag.begin_create(id.clone(), 0.0, 2026));

        let update = drag.pointer_move(250.0).unwrap();
        assert_eq!(update.initiative_id, id);
        assert_eq!(update.span, span(0, 3));
        assert_eq!(update.year, 2026);
    }

    #[test]
    fn test_create_drag_leftwards_swaps_bounds() {
        let mut drag = controller();
        drag.begin_create(InitiativeId::new(), 650.0, 2026);
        let update = drag.pointer_move(100.0).unwrap();
        assert_eq!(update.span, span(1, 8));
    }

    #[test]
    fn test_move_by_two_cells() {
        let mut drag = controller();
        drag.begin_bar_drag(InitiativeId::new(), HitZone::Body, 300.0, span(2, 5), 2026);
        let update = drag.pointer_move(460.0).unwrap();
        assert_eq!(update.span, span(4, 7));
    }

    #[test]
    fn test_move_uses_anchor_not_previous_move() {
        let mut drag = controller();
        drag.begin_bar_drag(InitiativeId::new(), HitZone::Body, 300.0, span(2, 5), 2026);
        for x in [330.0, 350.0, 370.0, 390.0] {
            drag.pointer_move(x);
        }
        let update = drag.pointer_move(300.0).unwrap();
        assert_eq!(update.span, span(2, 5));
    }

    #[test]
    fn test_move_clamps_each_bound() {
        assert_eq!(move_span(span(8, 10), 4), span(11, 11));
        assert_eq!(move_span(span(1, 3), -2), span(0, 1));
    }

    #[test]
    fn test_resize_start_past_end() {
        let mut drag = controller();
        drag.begin_bar_drag(InitiativeId::new(), HitZone::StartHandle, 325.0, span(4, 7), 2026);
        let update = drag.pointer_move(325.0 + 5.0 * 80.0).unwrap();
        assert_eq!(update.span, span(7, 7));
    }

    #[test]
    fn test_resize_end_before_start() {
        assert_eq!(resize_end(span(4, 7), -6), span(4, 4));
        assert_eq!(resize_end(span(4, 7), 9), span(4, 11));
    }

    #[test]
    fn test_gesture_invariants_hold_for_all_inputs() {
        for original in all_spans() {
            for delta in -15..=15 {
                let moved = move_span(original, delta);
                assert!(moved.start <= moved.end && moved.end <= 11);

                let rs = resize_start(original, delta);
                assert!(rs.start <= original.end);
                assert_eq!(rs.end, original.end);

                let re = resize_end(original, delta);
                assert!(re.end >= original.start);
                assert_eq!(re.start, original.start);
            }
        }
        for a in 0..12u8 {
            for c in 0..12u8 {
                assert_eq!(create_span(a, c), span(a.min(c), a.max(c)));
            }
        }
    }

    #[test]
    fn test_hit_test_zones() {
        let axis = TimeAxis::default();
        let bar = span(2, 5); // [160, 480)
        assert_eq!(hit_test(&axis, 12.0, bar, 159.0), None);
        assert_eq!(hit_test(&axis, 12.0, bar, 160.0), Some(HitZone::StartHandle));
        assert_eq!(hit_test(&axis, 12.0, bar, 171.9), Some(HitZone::StartHandle));
        assert_eq!(hit_test(&axis, 12.0, bar, 172.0), Some(HitZone::Body));
        assert_eq!(hit_test(&axis, 12.0, bar, 468.0), Some(HitZone::EndHandle));
        assert_eq!(hit_test(&axis, 12.0, bar, 480.0), None);
    }

    #[test]
    fn test_pointer_up_returns_to_idle() {
        let mut drag = controller();
        assert!(drag.pointer_up().is_none());

        drag.begin_create(InitiativeId::new(), 0.0, 2026);
        assert!(!drag.begin_create(InitiativeId::new(), 0.0, 2026));
        let session = drag.pointer_up().unwrap();
        assert_eq!(session.kind, DragKind::Create);
        assert_eq!(session.last, None);
        assert_eq!(drag.state(), &DragState::Idle);
        assert!(drag.pointer_move(100.0).is_none());
    }

    #[test]
    fn test_cancel_hands_back_original() {
        let mut drag = controller();
        drag.begin_bar_drag(InitiativeId::new(), HitZone::EndHandle, 470.0, span(2, 5), 2026);
        drag.pointer_move(700.0);
        let session = drag.cancel().unwrap();
        assert_eq!(session.original, Some(span(2, 5)));
        assert_eq!(session.last, Some(span(2, 8)));
        assert!(!drag.is_dragging());
    }
}
