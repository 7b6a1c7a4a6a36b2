//! Demo community loaded when the server starts with seeding enabled.

use chrono::{DateTime, NaiveDate, Utc};

use wedfund_types::models::{
    FundRequest, MaritalStatus, Notification, NotificationType, Payment, PaymentStatus,
    PaymentType, Priority, RelatedType, RequestStatus, Role, User,
};

pub struct SeedData {
    pub users: Vec<User>,
    pub payments: Vec<Payment>,
    pub fund_requests: Vec<FundRequest>,
    pub notifications: Vec<Notification>,
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    day(y, m, d).and_hms_opt(h, 0, 0).unwrap_or_default().and_utc()
}

fn user(
    id: &str,
    username: &str,
    name: &str,
    role: Role,
    marital_status: MaritalStatus,
    assigned_monthly_amount: i64,
    leader: Option<&str>,
) -> User {
    User {
        id: id.into(),
        username: username.into(),
        name: name.into(),
        role,
        marital_status,
        assigned_monthly_amount,
        responsible_member_id: leader.map(str::to_string),
    }
}

fn payment(
    id: &str,
    user_id: &str,
    amount: i64,
    date: NaiveDate,
    recorder: (&str, &str),
    payment_type: PaymentType,
    notes: Option<&str>,
) -> Payment {
    Payment {
        id: id.into(),
        user_id: user_id.into(),
        amount,
        date,
        time: "10:00".into(),
        recorded_by: recorder.0.into(),
        recorded_by_name: recorder.1.into(),
        payment_type,
        notes: notes.map(str::to_string),
    }
}

/// The one account an unseeded store starts with, so someone can log in.
pub fn admin() -> User {
    user(
        "1",
        "admin",
        "Fund Administrator",
        Role::Admin,
        MaritalStatus::Married,
        5000,
        None,
    )
}

pub fn demo() -> SeedData {
    use MaritalStatus::{Married, Unmarried};
    use PaymentType::{Collect, Pay};

    let users = vec![
        admin(),
        user("2", "rashid", "Rashid Khan", Role::ResponsibleMember, Married, 5000, None),
        user("3", "yusuf", "Yusuf Ali", Role::ResponsibleMember, Married, 5000, None),
        user("4", "imran", "Imran Sheikh", Role::Member, Unmarried, 5000, Some("2")),
        user("5", "bilal", "Bilal Ahmed", Role::Member, Unmarried, 3000, Some("2")),
        user("6", "hamza", "Hamza Qureshi", Role::Member, Unmarried, 5000, Some("3")),
        user("7", "zaid", "Zaid Malik", Role::Member, Married, 4000, Some("3")),
        user("8", "omar", "Omar Farooq", Role::Member, Unmarried, 5000, Some("3")),
    ];

    let administrator = ("1", "Fund Administrator");
    let rashid = ("2", "Rashid Khan");
    let yusuf = ("3", "Yusuf Ali");

    let payments = vec![
        payment("p1", "2", 5000, day(2024, 1, 5), administrator, Collect, None),
        payment("p2", "3", 5000, day(2024, 1, 6), administrator, Collect, None),
        payment("p3", "4", 5000, day(2024, 1, 10), rashid, Collect, Some("January")),
        payment("p4", "5", 3000, day(2024, 1, 12), rashid, Collect, None),
        payment("p5", "6", 5000, day(2024, 1, 15), yusuf, Collect, None),
        payment("p6", "7", 2000, day(2024, 1, 18), yusuf, Collect, Some("Half of January")),
        payment("p7", "4", 5000, day(2024, 2, 8), rashid, Collect, None),
        payment("p8", "8", 5000, day(2024, 2, 9), yusuf, Collect, None),
        payment("p9", "2", 5000, day(2024, 2, 11), administrator, Collect, None),
        payment("p10", "7", 40000, day(2024, 2, 20), administrator, Pay, Some("Wedding support")),
    ];

    let fund_requests = vec![
        FundRequest {
            id: "r1".into(),
            user_id: "6".into(),
            user_name: "Hamza Qureshi".into(),
            amount: 120_000,
            reason: "Wedding expenses".into(),
            status: RequestStatus::Approved,
            repayment_duration: Some("24 months".into()),
            requested_date: day(2024, 1, 20),
            reviewed_by: Some("1".into()),
            reviewed_date: Some(day(2024, 1, 25)),
            payment_date: Some(day(2024, 2, 1)),
            paid_amount: Some(60_000),
            payment_status: Some(PaymentStatus::Partial),
        },
        FundRequest {
            id: "r2".into(),
            user_id: "7".into(),
            user_name: "Zaid Malik".into(),
            amount: 40_000,
            reason: "Nikah ceremony".into(),
            status: RequestStatus::Approved,
            repayment_duration: Some("12 months".into()),
            requested_date: day(2024, 2, 2),
            reviewed_by: Some("1".into()),
            reviewed_date: Some(day(2024, 2, 5)),
            payment_date: Some(day(2024, 2, 20)),
            paid_amount: Some(40_000),
            payment_status: Some(PaymentStatus::Paid),
        },
        FundRequest {
            id: "r3".into(),
            user_id: "4".into(),
            user_name: "Imran Sheikh".into(),
            amount: 50_000,
            reason: "Engagement arrangements".into(),
            status: RequestStatus::Pending,
            repayment_duration: None,
            requested_date: day(2024, 2, 14),
            reviewed_by: None,
            reviewed_date: None,
            payment_date: None,
            paid_amount: None,
            payment_status: None,
        },
        FundRequest {
            id: "r4".into(),
            user_id: "5".into(),
            user_name: "Bilal Ahmed".into(),
            amount: 30_000,
            reason: "Venue deposit".into(),
            status: RequestStatus::Declined,
            repayment_duration: Some("6 months".into()),
            requested_date: day(2024, 1, 28),
            reviewed_by: Some("1".into()),
            reviewed_date: Some(day(2024, 2, 1)),
            payment_date: None,
            paid_amount: None,
            payment_status: None,
        },
    ];

    let notifications = vec![
        Notification {
            id: "n1".into(),
            title: "Fund request approved".into(),
            message: "Hamza Qureshi's request for 120000 was approved".into(),
            notification_type: NotificationType::FundRequestApproved,
            is_read: true,
            created_at: at(2024, 1, 25, 12),
            priority: Priority::High,
            related_id: Some("r1".into()),
            related_type: Some(RelatedType::FundRequest),
        },
        Notification {
            id: "n2".into(),
            title: "New fund request".into(),
            message: "Imran Sheikh requested 50000".into(),
            notification_type: NotificationType::FundRequestSubmitted,
            is_read: false,
            created_at: at(2024, 2, 14, 9),
            priority: Priority::Medium,
            related_id: Some("r3".into()),
            related_type: Some(RelatedType::FundRequest),
        },
        Notification {
            id: "n3".into(),
            title: "Monthly contribution due".into(),
            message: "Contributions for this month are due by the 15th".into(),
            notification_type: NotificationType::PaymentReminder,
            is_read: false,
            created_at: at(2024, 3, 1, 8),
            priority: Priority::Low,
            related_id: None,
            related_type: None,
        },
    ];

    SeedData {
        users,
        payments,
        fund_requests,
        notifications,
    }
}
