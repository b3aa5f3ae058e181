// src/config/consts.rs

// Net config
pub const URI_BASE: &str = "https://synergia.librus.pl";
pub const USER_AGENT: &str = "librus_scrape/0.1";
pub const MAX_REDIRECTS: usize = 10;

// Auth
pub const LOGIN_PATH: &str = "/loguj";
// The Location should be a full URI, but the portal sends a relative path.
pub const LOGIN_SUCCESS_PATHS: &[&str] = &["/uczen_index"];

// Pages
pub const ANNOUNCEMENTS_PATH: &str = "/ogloszenia";
pub const GRADES_PATH: &str = "/przegladaj_oceny/uczen";
pub const SCHEDULE_PATH: &str = "/przegladaj_plan_lekcji";
pub const EXAMS_PATH: &str = "/terminarz";
pub const EXAM_DETAIL_PREFIX: &str = "/terminarz/szczegoly/";
pub const ABSENCES_PATH: &str = "/przegladaj_nb/uczen";
pub const ABSENCE_DETAIL_PREFIX: &str = "/przegladaj_nb/szczegoly/";
pub const MESSAGES_PATH: &str = "/wiadomosci";

// Extraction
pub const ANNOUNCEMENT_MAX_AGE_YEARS: i32 = 2;
pub const ONLINE_LESSON_MARKER: &str = "lekcja online";
pub const ROOM_MARKER: &str = "s. ";
pub const LESSON_SEPARATOR: char = '-';
pub const SUBSTITUTION_PREFIX: &str = "zastępstwo";
pub const CANCELED_PREFIX: &str = "odwołane";
pub const SCHOOL_DAYS: usize = 5;
pub const GRADE_ROW_CELLS: usize = 7;
pub const SEMESTER_ROW_CELLS: usize = 10;
pub const SEMESTER_HEADER_SENTINELS: &[&str] = &["Grade", "1"];
pub const UNREAD_MARKER: &str = "font-weight: bold";
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
