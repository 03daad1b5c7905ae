//! Gender and audience filters for the teacher directory and course catalog.
//!
//! Both filters are a single pass that keeps the input order. A viewer
//! without a declared gender sees everything.

use crate::backend::{Audience, Course, Gender, Teacher};

/// Course audience tags a viewer of the given gender may see.
pub fn allowed_audiences(gender: Gender) -> &'static [Audience] {
    match gender {
        Gender::Male => &[Audience::Men, Audience::Adults, Audience::Children],
        Gender::Female => &[Audience::Women, Audience::Adults, Audience::Children],
    }
}

/// A teacher is visible to viewers of the same gender, and to everyone
/// when they teach children.
pub fn teacher_visible(teacher: &Teacher, viewer: Gender) -> bool {
    teacher.gender == Some(viewer) || teacher.audiences.contains(&Audience::Children)
}

/// An untagged course is visible to everyone; otherwise one of its tags
/// must be allowed for the viewer.
pub fn course_visible(course: &Course, viewer: Gender) -> bool {
    if course.audiences.is_empty() {
        return true;
    }
    let allowed = allowed_audiences(viewer);
    course.audiences.iter().any(|tag| allowed.contains(tag))
}

pub fn filter_teachers(teachers: Vec<Teacher>, viewer: Option<Gender>) -> Vec<Teacher> {
    match viewer {
        Some(gender) => teachers
            .into_iter()
            .filter(|t| teacher_visible(t, gender))
            .collect(),
        None => teachers,
    }
}

pub fn filter_courses(courses: Vec<Course>, viewer: Option<Gender>) -> Vec<Course> {
    match viewer {
        Some(gender) => courses
            .into_iter()
            .filter(|c| course_visible(c, gender))
            .collect(),
        None => courses,
    }
}
