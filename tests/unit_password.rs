use gradeport::utils::password::{hash_password, verify_password};

#[test]
fn hash_and_verify() {
    let hash = hash_password("correct horse battery staple").unwrap();
    assert_ne!(hash, "correct horse battery staple");
    assert!(verify_password("correct horse battery staple", &hash).unwrap());
    assert!(!verify_password("wrong password", &hash).unwrap());
}

#[test]
fn hashes_are_salted() {
    let first = hash_password("password123").unwrap();
    let second = hash_password("password123").unwrap();
    assert_ne!(first, second);
    assert!(verify_password("password123", &first).unwrap());
    assert!(verify_password("password123", &second).unwrap());
}
