//! In-memory room/tenant/payment ledger.
//!
//! A [`Ledger`] is an immutable snapshot. Every edit returns a new snapshot
//! and leaves the receiver untouched; rooms are shared between snapshots and
//! only the room being edited is copied. A failed edit returns an error and
//! produces no snapshot at all.

use std::sync::Arc;

use chrono::{Months, NaiveDate};
use tracing::debug;
use url::Url;

use crate::error::{LedgerError, ParseError, ValidationError};
use crate::models::dashboard::{DashboardSummary, UnpaidRoom};
use crate::models::kamar::{Payment, PaymentEdit, PaymentPattern, Room, Tenant, TenantEdit};

/// Room numbers every session starts with.
pub const INITIAL_ROOM_NUMBERS: [&str; 39] = [
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", //
    "101", "102", "103", "104", "105", "106", "107", "108", //
    "200", "201", "202", "203", "204", "205", "206", "207", "208", "209", "210", "211", "212", //
    "301", "302", "303", "304", "305", "306", "307", "308",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    rooms: Vec<Arc<Room>>,
}

impl Ledger {
    pub fn seeded() -> Self {
        Self::from_rooms(INITIAL_ROOM_NUMBERS.into_iter().map(Room::new))
    }

    pub fn from_rooms(rooms: impl IntoIterator<Item = Room>) -> Self {
        Self {
            rooms: rooms.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn room(&self, index: usize) -> Option<&Room> {
        self.rooms.get(index).map(Arc::as_ref)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().map(Arc::as_ref)
    }

    /// Replace one tenant field. Setting the entry date also moves the next
    /// payment date of every payment the tenant owns.
    pub fn set_tenant_field(
        &self,
        room_index: usize,
        tenant_index: usize,
        edit: TenantEdit,
    ) -> Result<Self, LedgerError> {
        let mut next = self.clone();
        let tenant = next.tenant_mut(room_index, tenant_index)?;

        match edit {
            TenantEdit::Name(name) => tenant.name = name,
            TenantEdit::Prodi(prodi) => tenant.prodi = prodi,
            TenantEdit::PhoneNumber(phone) => tenant.phone_number = phone,
            TenantEdit::DpDate(date) => tenant.dp_date = date,
            TenantEdit::EntryDate(date) => {
                if let Some(entry) = date {
                    for payment in tenant.payments.iter_mut() {
                        payment.next_payment_date =
                            Some(add_months(entry, payment.payment_pattern)?);
                    }
                    debug!(
                        room_index,
                        tenant_index,
                        %entry,
                        payments = tenant.payments.len(),
                        "recomputed next payment dates from entry date"
                    );
                }
                tenant.entry_date = date;
            }
        }

        Ok(next)
    }

    /// Replace one payment field. Setting the proof date moves that payment's
    /// next payment date; changing the pattern alone does not.
    pub fn set_payment_field(
        &self,
        room_index: usize,
        tenant_index: usize,
        payment_index: usize,
        edit: PaymentEdit,
    ) -> Result<Self, LedgerError> {
        let mut next = self.clone();
        let payment = next
            .tenant_mut(room_index, tenant_index)?
            .payments
            .get_mut(payment_index)
            .ok_or(ValidationError::PaymentNotFound(payment_index))?;

        match edit {
            PaymentEdit::Pattern(pattern) => payment.payment_pattern = pattern,
            PaymentEdit::ProofLink(link) => {
                validate_proof_link(&link)?;
                payment.payment_proof_link = link;
            }
            PaymentEdit::ProofDate(date) => {
                if let Some(proof) = date {
                    let due = add_months(proof, payment.payment_pattern)?;
                    debug!(
                        room_index,
                        tenant_index,
                        period = payment.period,
                        %proof,
                        %due,
                        "recomputed next payment date from proof date"
                    );
                    payment.next_payment_date = Some(due);
                }
                payment.payment_proof_date = date;
            }
        }

        Ok(next)
    }

    pub fn append_payment(
        &self,
        room_index: usize,
        tenant_index: usize,
    ) -> Result<Self, LedgerError> {
        let mut next = self.clone();
        let tenant = next.tenant_mut(room_index, tenant_index)?;
        let period = tenant.payments.len() as u32 + 1;
        tenant.payments.push(Payment::initial(period));
        Ok(next)
    }

    /// Append a room numbered one past the last room.
    pub fn append_room(&self) -> Result<Self, LedgerError> {
        let number = match self.rooms.last() {
            Some(last) => successor(&last.number)?,
            None => "1".to_string(),
        };

        if self.rooms().any(|room| room.number == number) {
            return Err(LedgerError::from(ValidationError::DuplicateRoom(number)));
        }

        let mut next = self.clone();
        next.rooms.push(Arc::new(Room::new(number)));
        Ok(next)
    }

    /// Room and tenant counts, plus the rooms whose latest payment is past due
    /// when `include_unpaid` is set.
    pub fn summary(&self, today: NaiveDate, include_unpaid: bool) -> DashboardSummary {
        let total_rooms = self.len();
        let occupied_rooms = self
            .rooms()
            .filter(|room| room.tenants.iter().any(Tenant::is_occupied))
            .count();
        let total_tenants = self
            .rooms()
            .flat_map(|room| room.tenants.iter())
            .filter(|tenant| tenant.is_occupied())
            .count();

        let unpaid_rooms = include_unpaid.then(|| {
            self.rooms()
                .enumerate()
                .filter_map(|(room_index, room)| {
                    let tenants: Vec<String> = room
                        .tenants
                        .iter()
                        .filter(|tenant| tenant.is_occupied() && is_overdue(tenant, today))
                        .map(|tenant| tenant.name.clone())
                        .collect();

                    (!tenants.is_empty()).then(|| UnpaidRoom {
                        room_index,
                        room_number: room.number.clone(),
                        tenants,
                    })
                })
                .collect()
        });

        DashboardSummary {
            total_rooms,
            occupied_rooms,
            empty_rooms: total_rooms - occupied_rooms,
            total_tenants,
            unpaid_rooms,
        }
    }

    fn tenant_mut(
        &mut self,
        room_index: usize,
        tenant_index: usize,
    ) -> Result<&mut Tenant, ValidationError> {
        let room = self
            .rooms
            .get_mut(room_index)
            .ok_or(ValidationError::RoomNotFound(room_index))?;
        if tenant_index >= room.tenants.len() {
            return Err(ValidationError::TenantNotFound(tenant_index));
        }
        Ok(&mut Arc::make_mut(room).tenants[tenant_index])
    }
}

/// Calendar month addition; the day is clamped to the end of a shorter month.
pub fn add_months(date: NaiveDate, pattern: PaymentPattern) -> Result<NaiveDate, ValidationError> {
    date.checked_add_months(Months::new(pattern.months()))
        .ok_or(ValidationError::DateOverflow)
}

fn successor(number: &str) -> Result<String, ParseError> {
    number
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_add(1))
        .map(|n| n.to_string())
        .ok_or_else(|| ParseError::InvalidRoomNumber(number.to_string()))
}

fn validate_proof_link(link: &str) -> Result<(), ValidationError> {
    if link.is_empty() {
        return Ok(());
    }
    match Url::parse(link) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::InvalidProofLink(link.to_string())),
    }
}

fn is_overdue(tenant: &Tenant, today: NaiveDate) -> bool {
    tenant
        .payments
        .last()
        .and_then(|payment| payment.next_payment_date)
        .is_some_and(|due| due < today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pattern(months: u32) -> PaymentPattern {
        PaymentPattern::new(months).unwrap()
    }

    fn payments_of(ledger: &Ledger, room: usize, tenant: usize) -> &[Payment] {
        &ledger.room(room).unwrap().tenants[tenant].payments
    }

    #[test]
    fn seeded_ledger_has_the_fixed_room_list() {
        let ledger = Ledger::seeded();
        assert_eq!(ledger.len(), 39);
        assert_eq!(ledger.room(0).unwrap().number, "1");
        assert_eq!(ledger.room(38).unwrap().number, "308");
        for room in ledger.rooms() {
            assert_eq!(room.tenants.len(), 2);
            for tenant in &room.tenants {
                assert_eq!(tenant.payments, vec![Payment::initial(1)]);
            }
        }
    }

    #[test]
    fn edits_leave_the_previous_snapshot_untouched() {
        let before = Ledger::seeded();
        let after = before
            .set_tenant_field(3, 0, TenantEdit::Name("Budi".to_string()))
            .unwrap();

        assert_eq!(before.room(3).unwrap().tenants[0].name, "");
        assert_eq!(after.room(3).unwrap().tenants[0].name, "Budi");
        assert_ne!(before, after);
    }

    #[test]
    fn text_fields_have_no_side_effects() {
        let ledger = Ledger::seeded()
            .set_tenant_field(0, 1, TenantEdit::Prodi("Teknik Sipil".to_string()))
            .unwrap()
            .set_tenant_field(0, 1, TenantEdit::PhoneNumber("08123456789".to_string()))
            .unwrap();

        let tenant = &ledger.room(0).unwrap().tenants[1];
        assert_eq!(tenant.prodi, "Teknik Sipil");
        assert_eq!(tenant.phone_number, "08123456789");
        assert_eq!(tenant.payments, vec![Payment::initial(1)]);
    }

    #[test]
    fn entry_date_recomputes_every_payment_with_its_own_pattern() {
        let ledger = Ledger::seeded()
            .append_payment(5, 0)
            .unwrap()
            .set_payment_field(5, 0, 1, PaymentEdit::Pattern(pattern(3)))
            .unwrap()
            .set_tenant_field(5, 0, TenantEdit::EntryDate(Some(date(2024, 8, 1))))
            .unwrap();

        let payments = payments_of(&ledger, 5, 0);
        assert_eq!(payments[0].next_payment_date, Some(date(2024, 9, 1)));
        assert_eq!(payments[1].next_payment_date, Some(date(2024, 11, 1)));
        assert_eq!(ledger.room(5).unwrap().tenants[0].entry_date, Some(date(2024, 8, 1)));
        // the other slot is untouched
        assert_eq!(payments_of(&ledger, 5, 1)[0].next_payment_date, None);
    }

    #[test]
    fn clearing_entry_date_keeps_next_payment_dates() {
        let ledger = Ledger::seeded()
            .set_tenant_field(0, 0, TenantEdit::EntryDate(Some(date(2024, 1, 15))))
            .unwrap()
            .set_tenant_field(0, 0, TenantEdit::EntryDate(None))
            .unwrap();

        assert_eq!(ledger.room(0).unwrap().tenants[0].entry_date, None);
        assert_eq!(payments_of(&ledger, 0, 0)[0].next_payment_date, Some(date(2024, 2, 15)));
    }

    #[test]
    fn dp_date_does_not_recompute() {
        let ledger = Ledger::seeded()
            .set_tenant_field(0, 0, TenantEdit::DpDate(Some(date(2024, 7, 20))))
            .unwrap();

        assert_eq!(ledger.room(0).unwrap().tenants[0].dp_date, Some(date(2024, 7, 20)));
        assert_eq!(payments_of(&ledger, 0, 0)[0].next_payment_date, None);
    }

    #[test]
    fn proof_date_recomputes_only_that_payment() {
        let ledger = Ledger::seeded()
            .set_tenant_field(2, 1, TenantEdit::EntryDate(Some(date(2024, 1, 10))))
            .unwrap()
            .append_payment(2, 1)
            .unwrap()
            .append_payment(2, 1)
            .unwrap()
            .set_payment_field(2, 1, 1, PaymentEdit::Pattern(pattern(6)))
            .unwrap()
            .set_payment_field(2, 1, 1, PaymentEdit::ProofDate(Some(date(2024, 2, 10))))
            .unwrap();

        let payments = payments_of(&ledger, 2, 1);
        assert_eq!(payments[0].next_payment_date, Some(date(2024, 2, 10)));
        assert_eq!(payments[1].payment_proof_date, Some(date(2024, 2, 10)));
        assert_eq!(payments[1].next_payment_date, Some(date(2024, 8, 10)));
        assert_eq!(payments[2].next_payment_date, None);
    }

    #[test]
    fn pattern_change_alone_keeps_next_payment_date() {
        let ledger = Ledger::seeded()
            .set_payment_field(0, 0, 0, PaymentEdit::Pattern(pattern(3)))
            .unwrap();
        let payment = &payments_of(&ledger, 0, 0)[0];
        assert_eq!(payment.payment_pattern, pattern(3));
        assert_eq!(payment.next_payment_date, None);

        let ledger = ledger
            .set_payment_field(0, 0, 0, PaymentEdit::ProofDate(Some(date(2024, 3, 1))))
            .unwrap()
            .set_payment_field(0, 0, 0, PaymentEdit::Pattern(pattern(1)))
            .unwrap();
        assert_eq!(payments_of(&ledger, 0, 0)[0].next_payment_date, Some(date(2024, 6, 1)));
    }

    #[test]
    fn month_addition_clamps_to_month_end() {
        assert_eq!(add_months(date(2024, 1, 31), pattern(1)), Ok(date(2024, 2, 29)));
        assert_eq!(add_months(date(2023, 1, 31), pattern(1)), Ok(date(2023, 2, 28)));
        assert_eq!(add_months(date(2024, 8, 31), pattern(3)), Ok(date(2024, 11, 30)));
        assert_eq!(add_months(date(2024, 11, 15), pattern(12)), Ok(date(2025, 11, 15)));
    }

    #[test]
    fn dates_past_the_calendar_range_are_rejected() {
        let ledger = Ledger::seeded();
        let overflow = LedgerError::from(ValidationError::DateOverflow);

        assert_eq!(add_months(NaiveDate::MAX, pattern(1)), Err(ValidationError::DateOverflow));
        assert_eq!(
            ledger.set_tenant_field(0, 0, TenantEdit::EntryDate(Some(NaiveDate::MAX))),
            Err(overflow.clone())
        );
        assert_eq!(
            ledger.set_payment_field(0, 0, 0, PaymentEdit::ProofDate(Some(NaiveDate::MAX))),
            Err(overflow)
        );
        assert_eq!(ledger, Ledger::seeded());
    }

    #[test]
    fn appended_payments_keep_period_equal_to_position() {
        let mut ledger = Ledger::seeded();
        for _ in 0..4 {
            ledger = ledger.append_payment(10, 1).unwrap();
        }

        let payments = payments_of(&ledger, 10, 1);
        assert_eq!(payments.len(), 5);
        for (position, payment) in payments.iter().enumerate() {
            assert_eq!(payment.period as usize, position + 1);
            assert_eq!(payment.payment_pattern, PaymentPattern::default());
            assert_eq!(payment.payment_proof_date, None);
            assert_eq!(payment.next_payment_date, None);
        }
    }

    #[test]
    fn append_room_after_308_yields_309() {
        let ledger = Ledger::seeded().append_room().unwrap();
        assert_eq!(ledger.len(), 40);

        let room = ledger.room(39).unwrap();
        assert_eq!(room.number, "309");
        assert_eq!(room, &Room::new("309"));
    }

    #[test]
    fn append_room_rejects_non_numeric_last_number() {
        let ledger = Ledger::from_rooms([Room::new("101"), Room::new("A1")]);
        assert_eq!(
            ledger.append_room(),
            Err(LedgerError::Parse(ParseError::InvalidRoomNumber("A1".to_string())))
        );
    }

    #[test]
    fn append_room_rejects_duplicate_successor() {
        let ledger = Ledger::from_rooms([Room::new("6"), Room::new("5")]);
        assert_eq!(
            ledger.append_room(),
            Err(LedgerError::Validation(ValidationError::DuplicateRoom("6".to_string())))
        );
    }

    #[test]
    fn append_room_on_empty_ledger_starts_at_one() {
        let ledger = Ledger::default().append_room().unwrap();
        assert_eq!(ledger.room(0).unwrap().number, "1");
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let ledger = Ledger::seeded();
        assert_eq!(
            ledger.append_payment(99, 0),
            Err(LedgerError::from(ValidationError::RoomNotFound(99)))
        );
        assert_eq!(
            ledger.set_tenant_field(0, 2, TenantEdit::Name("x".to_string())),
            Err(LedgerError::from(ValidationError::TenantNotFound(2)))
        );
        assert_eq!(
            ledger.set_payment_field(0, 0, 1, PaymentEdit::Pattern(pattern(2))),
            Err(LedgerError::from(ValidationError::PaymentNotFound(1)))
        );
    }

    #[test]
    fn proof_link_must_be_http_url() {
        let ledger = Ledger::seeded();
        let link = "https://example.com/bukti-bayar.jpg".to_string();
        let updated = ledger
            .set_payment_field(0, 0, 0, PaymentEdit::ProofLink(link.clone()))
            .unwrap();
        assert_eq!(payments_of(&updated, 0, 0)[0].payment_proof_link, link);

        assert!(updated
            .set_payment_field(0, 0, 0, PaymentEdit::ProofLink(String::new()))
            .is_ok());

        for bad in ["bukti.jpg", "ftp://example.com/x", "javascript:alert(1)"] {
            assert_eq!(
                ledger.set_payment_field(0, 0, 0, PaymentEdit::ProofLink(bad.to_string())),
                Err(LedgerError::from(ValidationError::InvalidProofLink(bad.to_string())))
            );
        }
    }

    #[test]
    fn summary_counts_rooms_and_tenants() {
        let ledger = Ledger::seeded()
            .set_tenant_field(0, 0, TenantEdit::Name("Andi".to_string()))
            .unwrap()
            .set_tenant_field(0, 1, TenantEdit::Name("Budi".to_string()))
            .unwrap()
            .set_tenant_field(4, 1, TenantEdit::Name("Citra".to_string()))
            .unwrap()
            .set_tenant_field(7, 0, TenantEdit::Name("   ".to_string()))
            .unwrap();

        let summary = ledger.summary(date(2024, 9, 1), true);
        assert_eq!(summary.total_rooms, 39);
        assert_eq!(summary.occupied_rooms, 2);
        assert_eq!(summary.empty_rooms, 37);
        assert_eq!(summary.total_tenants, 3);
        assert_eq!(summary.unpaid_rooms, Some(vec![]));
    }

    #[test]
    fn summary_lists_tenants_whose_latest_payment_is_past_due() {
        let ledger = Ledger::seeded()
            .set_tenant_field(11, 0, TenantEdit::Name("Dewi".to_string()))
            .unwrap()
            .set_tenant_field(11, 0, TenantEdit::EntryDate(Some(date(2024, 6, 1))))
            .unwrap()
            .set_tenant_field(11, 1, TenantEdit::Name("Eka".to_string()))
            .unwrap()
            .set_tenant_field(11, 1, TenantEdit::EntryDate(Some(date(2024, 6, 1))))
            .unwrap()
            .append_payment(11, 1)
            .unwrap()
            .set_payment_field(11, 1, 1, PaymentEdit::ProofDate(Some(date(2024, 7, 1))))
            .unwrap()
            .set_tenant_field(12, 0, TenantEdit::EntryDate(Some(date(2024, 1, 1))))
            .unwrap();

        // Dewi due 2024-07-01, Eka due 2024-08-01, room 12 slot has no name
        let summary = ledger.summary(date(2024, 7, 15), true);
        assert_eq!(
            summary.unpaid_rooms,
            Some(vec![UnpaidRoom {
                room_index: 11,
                room_number: "102".to_string(),
                tenants: vec!["Dewi".to_string()],
            }])
        );

        assert_eq!(ledger.summary(date(2024, 7, 15), false).unpaid_rooms, None);
    }
}
