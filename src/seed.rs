//! The in-memory seed data the application boots with: categories, the
//! two-course catalog, the demo payment history, seed accounts, and the
//! pricing-page plans.

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

use crate::content::{
    ContentBlock, FileBlock, GalleryBlock, GalleryImage, QuizBlock, QuizQuestion, TextBlock,
    VideoBlock,
};
use crate::types::{
    Category, Course, Lesson, Payment, PaymentKind, PaymentMethod, PaymentStatus, Plan,
    SubscriptionPlan, User, UserRole,
};

fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    datetime(y, m, d, 0, 0, 0)
}

fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s)
        .single()
        .unwrap_or_else(Utc::now)
}

/// The category rail shown on the home screen.
pub fn categories() -> Vec<Category> {
    vec![
        Category {
            id: "cat1".to_string(),
            name: "Skills".to_string(),
            icon: "fa-lightbulb".to_string(),
        },
        Category {
            id: "cat2".to_string(),
            name: "Dugsi".to_string(),
            icon: "fa-mosque".to_string(),
        },
        Category {
            id: "cat3".to_string(),
            name: "Ganacsi".to_string(),
            icon: "fa-chart-line".to_string(),
        },
    ]
}

/// The seed catalog: one technology course and one algebra course, together
/// exercising every block kind.
pub fn courses() -> Vec<Course> {
    vec![
        Course {
            course_id: "c1".to_string(),
            title: "Ku Hordhaca Tignoolajoyadda".to_string(),
            description: "Baro aasaaska tignoolajiyada, sida ay u shaqeyso, iyo muhiimadda ay u leedahay nolosha casriga ah.".to_string(),
            category: "Skills".to_string(),
            instructor: "Eng. Ahmed Ali".to_string(),
            thumbnail: "https://images.unsplash.com/photo-1517694712202-14dd9538aa97?auto=format&fit=crop&q=80&w=400".to_string(),
            is_premium: true,
            is_published: true,
            price: Some(7.0),
            created_at: date(2023, 10, 1),
            lessons: vec![Lesson {
                lesson_id: "l1".to_string(),
                title: "Maxay tahay Tignoolajiyadu?".to_string(),
                description: None,
                duration: "15:45".to_string(),
                order: 1,
                is_preview: true,
                content_blocks: vec![
                    ContentBlock::Video(VideoBlock {
                        id: "b1".to_string(),
                        title: None,
                        video_url: "https://www.w3schools.com/html/mov_bbb.mp4".to_string(),
                        thumbnail: Some("https://images.unsplash.com/photo-1517694712202-14dd9538aa97?auto=format&fit=crop&q=80&w=400".to_string()),
                        resolutions: vec![
                            "480p".to_string(),
                            "720p".to_string(),
                            "1080p".to_string(),
                        ],
                    }),
                    ContentBlock::Text(TextBlock {
                        id: "b2".to_string(),
                        title: Some("Qoraalka Casharka".to_string()),
                        body: "Tignoolajiyadu waa isticmaalka aqoonta sayniska si loo xaliyo dhibaatooyinka nolosha dhabta ah. Waxay ka kooban tahay qalabka (hardware) iyo barnaamijyada (software).".to_string(),
                        is_note: false,
                    }),
                    ContentBlock::Gallery(GalleryBlock {
                        id: "b3".to_string(),
                        title: Some("Qalabka Hardware-ka".to_string()),
                        images: vec![
                            GalleryImage {
                                url: "https://images.unsplash.com/photo-1525547719571-a2d4ac8945e2?auto=format&fit=crop&q=80&w=400".to_string(),
                                caption: "Laptop Casri ah".to_string(),
                            },
                            GalleryImage {
                                url: "https://images.unsplash.com/photo-1547082299-de196ea013d6?auto=format&fit=crop&q=80&w=400".to_string(),
                                caption: "Processor (Maskaxda computerka)".to_string(),
                            },
                        ],
                    }),
                    ContentBlock::File(FileBlock {
                        id: "b4".to_string(),
                        title: None,
                        file_url: "#".to_string(),
                        file_name: "Aasaaska_Tignoolajiyada.pdf".to_string(),
                        file_size: "1.2 MB".to_string(),
                        file_type: "PDF".to_string(),
                    }),
                ],
            }],
        },
        Course {
            course_id: "c2".to_string(),
            title: "Xisaabta Aljebra 1".to_string(),
            description: "Baro Aljebra bilow ilaa dhamaad.".to_string(),
            category: "Dugsi".to_string(),
            instructor: "Macalin Maryan".to_string(),
            thumbnail: "https://images.unsplash.com/photo-1509228468518-180dd486490e?auto=format&fit=crop&q=80&w=400".to_string(),
            is_premium: true,
            is_published: true,
            price: Some(15.0),
            created_at: date(2023, 11, 15),
            lessons: vec![Lesson {
                lesson_id: "l2".to_string(),
                title: "Variables iyo Equations".to_string(),
                description: None,
                duration: "20:00".to_string(),
                order: 1,
                is_preview: true,
                content_blocks: vec![
                    ContentBlock::Text(TextBlock {
                        id: "b5".to_string(),
                        title: None,
                        body: "Variables waa xarfo matalaya lambar aan la garanayn. Tusaale: x + 5 = 10.".to_string(),
                        is_note: true,
                    }),
                    ContentBlock::Quiz(QuizBlock {
                        id: "b6".to_string(),
                        title: Some("Isku day fahamkaaga".to_string()),
                        questions: vec![QuizQuestion {
                            question: "Haddii x + 2 = 5, waa imisa x?".to_string(),
                            options: vec![
                                "2".to_string(),
                                "3".to_string(),
                                "7".to_string(),
                                "1".to_string(),
                            ],
                            correct: 1,
                        }],
                    }),
                ],
            }],
        },
    ]
}

/// The demo payment history.
pub fn payments() -> Vec<Payment> {
    vec![Payment {
        payment_id: "pay_1".to_string(),
        user_id: "u125".to_string(),
        user_name: "Jaamac Faarax".to_string(),
        course_id: Some("c2".to_string()),
        amount: 15.0,
        currency: "USD".to_string(),
        payment_method: PaymentMethod::EvcPlus,
        payment_type: PaymentKind::CoursePurchase,
        status: PaymentStatus::Success,
        reference: Some("TX992831".to_string()),
        created_at: datetime(2023, 12, 1, 10, 20, 0),
    }]
}

/// The admin seed account every restored session hydrates from.
pub fn primary_user() -> User {
    User {
        user_id: "u123".to_string(),
        name: "Abdisalam Yusuf".to_string(),
        email: "abdisalam@yaaldug.so".to_string(),
        role: UserRole::Admin,
        is_active: true,
        avatar_seed: Some("Abdisalam".to_string()),
        profile_image: None,
        enrolled_courses: vec!["c1".to_string()],
        progress: HashMap::from([("c1".to_string(), 25)]),
        completed_lessons: HashSet::from(["l1".to_string()]),
        lesson_resumes: HashMap::from([("l1".to_string(), 45)]),
        created_at: date(2023, 9, 20),
        subscription: None,
    }
}

/// All seed accounts.
pub fn users() -> Vec<User> {
    vec![
        primary_user(),
        User {
            user_id: "u124".to_string(),
            name: "Sahra Ahmed".to_string(),
            email: "sahra@yaaldug.so".to_string(),
            role: UserRole::Teacher,
            is_active: true,
            avatar_seed: Some("Sahra".to_string()),
            profile_image: None,
            enrolled_courses: vec![],
            progress: HashMap::new(),
            completed_lessons: HashSet::new(),
            lesson_resumes: HashMap::new(),
            created_at: date(2023, 10, 5),
            subscription: None,
        },
    ]
}

static PLANS: Lazy<Vec<Plan>> = Lazy::new(|| {
    vec![
        Plan {
            id: "plan_monthly".to_string(),
            name: "Bille (Monthly)".to_string(),
            price: 10.0,
            duration: SubscriptionPlan::Monthly,
            features: vec![
                "AI Tutor (Had iyo goor)".to_string(),
                "Certificates (Shahaado)".to_string(),
                "Dhammaan Koorsooyinka".to_string(),
                "Live Sessions".to_string(),
            ],
            is_popular: false,
        },
        Plan {
            id: "plan_yearly".to_string(),
            name: "Sanadle (Yearly)".to_string(),
            price: 100.0,
            duration: SubscriptionPlan::Yearly,
            features: vec![
                "AI Tutor (Priority)".to_string(),
                "Certificates included".to_string(),
                "Offline Access".to_string(),
                "2 Months Free".to_string(),
                "Support direct".to_string(),
            ],
            is_popular: true,
        },
    ]
});

/// The pricing-page offers.
pub fn plans() -> &'static [Plan] {
    &PLANS
}
