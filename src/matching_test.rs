use crate::backend::{Audience, Gender};
use crate::matching::{course_visible, filter_courses, filter_teachers, teacher_visible};
use crate::test_support::{course, teacher};

#[test]
fn teachers_match_on_gender_or_children() {
    let teachers = vec![
        teacher("t-1", "Avi", Some(Gender::Male), &[Audience::Men]),
        teacher("t-2", "Dina", Some(Gender::Female), &[Audience::Women]),
        teacher("t-3", "Miri", Some(Gender::Female), &[Audience::Children]),
        teacher("t-4", "Noa", None, &[]),
    ];

    let for_men = filter_teachers(teachers.clone(), Some(Gender::Male));
    let ids: Vec<_> = for_men.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t-1", "t-3"]);

    let for_women = filter_teachers(teachers.clone(), Some(Gender::Female));
    let ids: Vec<_> = for_women.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t-2", "t-3"]);
}

#[test]
fn viewer_without_gender_sees_everything_in_order() {
    let teachers = vec![
        teacher("t-2", "Dina", Some(Gender::Female), &[]),
        teacher("t-1", "Avi", Some(Gender::Male), &[]),
    ];
    let all = filter_teachers(teachers.clone(), None);
    assert_eq!(all, teachers);

    let courses = vec![course("c-1", None, true), course("c-2", Some(5.0), false)];
    assert_eq!(filter_courses(courses.clone(), None), courses);
}

#[test]
fn teacher_property_holds_for_all_combinations() {
    let genders = [None, Some(Gender::Male), Some(Gender::Female)];
    let audience_sets: [&[Audience]; 3] = [&[], &[Audience::Children], &[Audience::Adults]];

    for viewer in [Gender::Male, Gender::Female] {
        for gender in genders {
            for audiences in audience_sets {
                let t = teacher("t", "T", gender, audiences);
                let expected = gender == Some(viewer) || audiences.contains(&Audience::Children);
                assert_eq!(teacher_visible(&t, viewer), expected);
            }
        }
    }
}

#[test]
fn courses_use_per_gender_allow_lists() {
    let mut untagged = course("c-0", None, true);
    untagged.audiences = vec![];
    let mut women = course("c-1", None, true);
    women.audiences = vec![Audience::Women];
    let mut men = course("c-2", None, true);
    men.audiences = vec![Audience::Men];
    let mut family = course("c-3", None, true);
    family.audiences = vec![Audience::Adults, Audience::Women];
    let mut kids = course("c-4", None, true);
    kids.audiences = vec![Audience::Children];
    let mut unknown = course("c-5", None, true);
    unknown.audiences = vec![Audience::Other];

    let courses = vec![untagged, women, men, family, kids, unknown];

    let for_men = filter_courses(courses.clone(), Some(Gender::Male));
    let ids: Vec<_> = for_men.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["c-0", "c-2", "c-3", "c-4"]);

    let for_women = filter_courses(courses, Some(Gender::Female));
    let ids: Vec<_> = for_women.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["c-0", "c-1", "c-3", "c-4"]);
}

#[test]
fn unknown_tags_alone_hide_a_course() {
    let mut c = course("c-1", None, true);
    c.audiences = vec![Audience::Other];
    assert!(!course_visible(&c, Gender::Male));
    assert!(!course_visible(&c, Gender::Female));
}
