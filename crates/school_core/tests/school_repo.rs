use chrono::NaiveDate;
use school_core::db::open_db_in_memory;
use school_core::{
    Address, AddressRepository, Course, CourseRepository, EntityKind, Gender, RepoError,
    SqliteSchoolRepository, Student, StudentRepository, TransactionScope,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn student(name: &str, gender: Gender) -> Student {
    Student::new(name, gender, date(2000, 5, 17))
}

#[test]
fn save_assigns_ids_and_find_roundtrips() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchoolRepository::try_new(&conn).unwrap();

    let address = repo
        .save_address(&Address::new("1 Main St", "Ankara", "TR"))
        .unwrap();
    let mut ada = student("Ada", Gender::Female);
    ada.address_id = address.id;
    let saved = repo.save_student(&ada).unwrap();

    let id = saved.id.expect("store should assign an id");
    let loaded = repo.find_student_by_id(id).unwrap().unwrap();
    assert_eq!(loaded, saved);
    assert_eq!(loaded.birth_date, date(2000, 5, 17));
    assert_eq!(loaded.address_id, address.id);
}

#[test]
fn find_all_returns_rows_in_id_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchoolRepository::try_new(&conn).unwrap();

    for name in ["Zed", "Amy", "Bob"] {
        repo.save_student(&student(name, Gender::Other)).unwrap();
    }

    let names: Vec<_> = repo
        .find_all_students()
        .unwrap()
        .into_iter()
        .map(|student| student.name)
        .collect();
    assert_eq!(names, ["Zed", "Amy", "Bob"]);
}

#[test]
fn update_missing_rows_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchoolRepository::try_new(&conn).unwrap();

    let mut ghost = student("Ghost", Gender::Male);
    ghost.id = Some(404);
    let err = repo.save_student(&ghost).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            kind: EntityKind::Student,
            id: 404
        }
    ));

    let err = repo.delete_course_by_id(9).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            kind: EntityKind::Course,
            id: 9
        }
    ));
}

#[test]
fn enrollment_rows_are_visible_from_both_sides() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchoolRepository::try_new(&conn).unwrap();

    let course = repo.save_course(&Course::new("Databases", "CS305", 6)).unwrap();
    let mut ada = student("Ada", Gender::Female);
    ada.course_ids.insert(course.id.unwrap());
    let ada = repo.save_student(&ada).unwrap();

    let loaded_course = repo.find_course_by_id(course.id.unwrap()).unwrap().unwrap();
    assert!(loaded_course.has_student(ada.id.unwrap()));
}

#[test]
fn saving_course_keeps_instructor_assignment() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchoolRepository::try_new(&conn).unwrap();

    let mut course = repo.save_course(&Course::new("Logic", "PH101", 3)).unwrap();
    let id = course.id.unwrap();
    repo.assign_instructor(id, Some(77)).unwrap();

    course.name = "Formal Logic".to_string();
    repo.save_course(&course).unwrap();

    assert_eq!(repo.instructor_id_of_course(id).unwrap(), Some(77));
    assert!(matches!(
        repo.instructor_id_of_course(id + 1),
        Err(RepoError::NotFound {
            kind: EntityKind::Course,
            ..
        })
    ));
}

#[test]
fn deleting_enrolled_student_is_blocked_by_foreign_key() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchoolRepository::try_new(&conn).unwrap();

    let course = repo.save_course(&Course::new("Databases", "CS305", 6)).unwrap();
    let mut ada = student("Ada", Gender::Female);
    ada.course_ids.insert(course.id.unwrap());
    let ada = repo.save_student(&ada).unwrap();

    let err = repo.delete_student_by_id(ada.id.unwrap()).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert!(repo.find_student_by_id(ada.id.unwrap()).unwrap().is_some());
}

#[test]
fn deleting_address_clears_student_reference() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchoolRepository::try_new(&conn).unwrap();

    let address = repo
        .save_address(&Address::new("2 Side St", "Bursa", "TR"))
        .unwrap();
    let mut bob = student("Bob", Gender::Male);
    bob.address_id = address.id;
    let bob = repo.save_student(&bob).unwrap();

    repo.delete_address_by_id(address.id.unwrap()).unwrap();

    let loaded = repo.find_student_by_id(bob.id.unwrap()).unwrap().unwrap();
    assert_eq!(loaded.address_id, None);
}

#[test]
fn name_lookup_counts_and_gender_groups() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchoolRepository::try_new(&conn).unwrap();

    repo.save_student(&student("Ada", Gender::Female)).unwrap();
    repo.save_student(&student("Ada", Gender::Female)).unwrap();
    repo.save_student(&student("Alan", Gender::Male)).unwrap();

    assert_eq!(repo.find_students_by_name("Ada").unwrap().len(), 2);
    assert!(repo.find_students_by_name("ada").unwrap().is_empty());
    assert_eq!(repo.count_students().unwrap(), 3);

    let groups: Vec<_> = repo
        .group_by_gender()
        .unwrap()
        .into_iter()
        .map(|group| (group.gender, group.count))
        .collect();
    assert_eq!(groups, [(Gender::Female, 2), (Gender::Male, 1)]);
}

#[test]
fn failed_transaction_rolls_back_every_write() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchoolRepository::try_new(&conn).unwrap();

    let result: Result<(), RepoError> = repo.in_transaction(|| {
        repo.save_student(&student("Temp", Gender::Other))?;
        repo.save_course(&Course::new("Temp", "T0", 1))?;
        Err(RepoError::InvalidData("abort".to_string()))
    });

    assert!(result.is_err());
    assert_eq!(repo.count_students().unwrap(), 0);
    assert!(repo.find_all_courses().unwrap().is_empty());
}

#[test]
fn successful_transaction_commits() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchoolRepository::try_new(&conn).unwrap();

    let saved = repo
        .in_transaction(|| repo.save_student(&student("Kept", Gender::Male)))
        .unwrap();

    assert!(repo.find_student_by_id(saved.id.unwrap()).unwrap().is_some());
}
