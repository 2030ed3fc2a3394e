use regex::Regex;
use std::sync::OnceLock;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

pub fn is_valid_email(email: &str) -> bool {
    let re = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[\w.+-]+@[\w-]+(\.[\w-]+)+$").expect("이메일 정규식이 잘못되었습니다")
    });
    re.is_match(email)
}
