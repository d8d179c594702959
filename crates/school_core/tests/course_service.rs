use chrono::{Datelike, Local, NaiveDate};
use school_core::db::open_db_in_memory;
use school_core::{
    CourseRecord, CourseService, EmptyListPolicy, EnrollmentCountPolicy, EntityKind, Gender,
    SchoolConfig, ServiceError, SqliteSchoolRepository, StudentRecord, StudentService,
};

fn course_record(name: &str, code: &str) -> CourseRecord {
    CourseRecord {
        id: None,
        name: name.to_string(),
        code: code.to_string(),
        credits: 5,
        number_of_students: 0,
        instructor_id: None,
    }
}

fn student_record(name: &str) -> StudentRecord {
    StudentRecord {
        id: None,
        name: name.to_string(),
        gender: Gender::Male,
        birth_date: NaiveDate::from_ymd_opt(Local::now().year() - 22, 3, 1).unwrap(),
    }
}

#[test]
fn number_of_students_is_store_wide_by_default() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchoolRepository::try_new(&conn).unwrap();
    let students = StudentService::new(repo, SchoolConfig::default());
    let courses = CourseService::new(repo, SchoolConfig::default());

    let empty = courses.create_course(&course_record("Art", "AR1")).unwrap();
    assert_eq!(empty.number_of_students, 0);

    for name in ["Ada", "Alan", "Grace"] {
        students.create_student(&student_record(name)).unwrap();
    }

    let record = courses.get_course(empty.id.unwrap()).unwrap();
    assert_eq!(record.number_of_students, 3);
    assert_eq!(record.number_of_students, courses.number_of_students().unwrap());
}

#[test]
fn number_of_students_can_follow_course_roster() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchoolRepository::try_new(&conn).unwrap();
    let config = SchoolConfig {
        enrollment_count: EnrollmentCountPolicy::PerCourse,
        ..SchoolConfig::default()
    };
    let students = StudentService::new(repo, config);
    let courses = CourseService::new(repo, config);

    let course_id = courses
        .create_course(&course_record("Art", "AR1"))
        .unwrap()
        .id
        .unwrap();
    let ada = students.create_student(&student_record("Ada")).unwrap();
    students.create_student(&student_record("Alan")).unwrap();
    let enrolled = students.enroll_in_course(ada.id, course_id).unwrap();

    assert_eq!(enrolled.courses[0].number_of_students, 1);
    assert_eq!(courses.get_course(course_id).unwrap().number_of_students, 1);
}

#[test]
fn instructor_id_is_resolved_at_mapping_time() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchoolRepository::try_new(&conn).unwrap();
    let courses = CourseService::new(repo, SchoolConfig::default());

    let id = courses
        .create_course(&course_record("Chemistry", "CH1"))
        .unwrap()
        .id
        .unwrap();
    assert_eq!(courses.get_course(id).unwrap().instructor_id, None);

    let assigned = courses.assign_instructor(id, Some(12)).unwrap();
    assert_eq!(assigned.instructor_id, Some(12));
    assert_eq!(courses.instructor_of_course_id(id).unwrap(), Some(12));

    assert!(matches!(
        courses.instructor_of_course_id(id + 1),
        Err(ServiceError::NotFound {
            kind: EntityKind::Course,
            ..
        })
    ));
}

#[test]
fn create_ignores_derived_input_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchoolRepository::try_new(&conn).unwrap();
    let courses = CourseService::new(repo, SchoolConfig::default());

    let mut record = course_record("Music", "MU1");
    record.number_of_students = 99;
    record.instructor_id = Some(5);
    let created = courses.create_course(&record).unwrap();

    assert_eq!(created.number_of_students, 0);
    assert_eq!(created.instructor_id, None);
}

#[test]
fn update_keeps_roster_and_rejects_missing_course() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchoolRepository::try_new(&conn).unwrap();
    let students = StudentService::new(repo, SchoolConfig::default());
    let courses = CourseService::new(repo, SchoolConfig::default());

    let course_id = courses
        .create_course(&course_record("Art", "AR1"))
        .unwrap()
        .id
        .unwrap();
    let ada = students.create_student(&student_record("Ada")).unwrap();
    students.enroll_in_course(ada.id, course_id).unwrap();

    let updated = courses
        .update_course(&course_record("Fine Art", "AR2"), course_id)
        .unwrap();
    assert_eq!(updated.name, "Fine Art");
    assert_eq!(updated.code, "AR2");
    assert!(courses.find_course_by_id(course_id).unwrap().has_student(ada.id));

    assert!(matches!(
        courses.update_course(&course_record("X", "X"), 404),
        Err(ServiceError::NotFound {
            kind: EntityKind::Course,
            id: 404
        })
    ));
}

#[test]
fn delete_course_withdraws_students_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchoolRepository::try_new(&conn).unwrap();
    let students = StudentService::new(repo, SchoolConfig::default());
    let courses = CourseService::new(repo, SchoolConfig::default());

    let course_id = courses
        .create_course(&course_record("Art", "AR1"))
        .unwrap()
        .id
        .unwrap();
    let ada = students.create_student(&student_record("Ada")).unwrap();
    students.enroll_in_course(ada.id, course_id).unwrap();

    let message = courses.delete_course(course_id).unwrap();
    assert_eq!(message, format!("Course with id = {course_id} Deleted...."));
    assert!(students.get_student(ada.id).unwrap().courses.is_empty());
    assert!(matches!(
        courses.get_course(course_id),
        Err(ServiceError::NotFound { .. })
    ));
}

#[test]
fn list_courses_follows_empty_list_policy() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSchoolRepository::try_new(&conn).unwrap();
    let strict = CourseService::new(repo, SchoolConfig::default());
    assert!(matches!(
        strict.list_courses(),
        Err(ServiceError::EmptyList(EntityKind::Course))
    ));

    let lenient = CourseService::new(
        repo,
        SchoolConfig {
            empty_list: EmptyListPolicy::EmptySuccess,
            ..SchoolConfig::default()
        },
    );
    assert!(lenient.list_courses().unwrap().is_empty());

    strict.create_course(&course_record("B", "B1")).unwrap();
    strict.create_course(&course_record("A", "A1")).unwrap();
    let names: Vec<_> = strict
        .list_courses()
        .unwrap()
        .into_iter()
        .map(|course| course.name)
        .collect();
    assert_eq!(names, ["B", "A"]);
}
