//! TOML fixtures: a whole catalog plus the page view in one file.

use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;
use snav_catalog::Activity;
use snav_catalog::Category;
use snav_catalog::Course;
use snav_catalog::CourseId;
use snav_catalog::InMemoryCatalog;
use snav_catalog::Section;
use snav_catalog::User;
use snav_catalog::UserId;
use snav_core::PageView;

#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub site: Course,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub enrolments: Vec<Enrolment>,
    #[serde(default)]
    pub access: Vec<AccessRule>,
    pub view: PageView,
}

#[derive(Debug, Deserialize)]
pub struct Enrolment {
    pub course: CourseId,
    pub user: UserId,
}

#[derive(Debug, Deserialize)]
pub struct AccessRule {
    pub course: CourseId,
    pub user: UserId,
    pub allowed: bool,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content)?)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Turn the fixture into a catalog and the view to build for.
    pub fn into_parts(self) -> (InMemoryCatalog, PageView) {
        let mut catalog = InMemoryCatalog::new().with_site_course(self.site);
        for category in self.categories {
            catalog = catalog.with_category(category);
        }
        for course in self.courses {
            catalog = catalog.with_course(course);
        }
        for section in self.sections {
            catalog = catalog.with_section(section);
        }
        for activity in self.activities {
            catalog = catalog.with_activity(activity);
        }
        for user in self.users {
            catalog = catalog.with_user(user);
        }
        for enrolment in self.enrolments {
            catalog = catalog.with_enrolment(enrolment.course, enrolment.user);
        }
        for rule in self.access {
            catalog = catalog.with_access_override(rule.course, rule.user, rule.allowed);
        }
        (catalog, self.view)
    }
}

#[cfg(test)]
mod tests {
    use snav_catalog::Catalog;
    use snav_catalog::CourseId;
    use snav_catalog::UserId;
    use snav_core::PageContext;

    use super::Fixture;

    const DEMO: &str = r#"
[site]
id = 1
category = 0
full_name = "Demo site"
short_name = "demo"
format = "site"

[[categories]]
id = 5
name = "Science"
parent = 0
path = "/5"
sort_order = 1
course_count = 1

[[courses]]
id = 3
category = 5
full_name = "Physics"
short_name = "phys"

[[users]]
id = 2
full_name = "Sam"

[[enrolments]]
course = 3
user = 2

[view]
viewer = { id = 2 }
page_url = "/course/view.php?id=3"

[view.context]
kind = "course"
course = 3
"#;

    #[test]
    fn parses_and_builds_a_catalog() {
        let fixture = Fixture::parse(DEMO).expect("fixture parses");
        let (catalog, view) = fixture.into_parts();

        assert_eq!(catalog.site_course().unwrap().id, CourseId::new(1));
        assert!(catalog
            .is_enrolled(CourseId::new(3), UserId::new(2))
            .unwrap());
        assert_eq!(
            view.context,
            PageContext::Course {
                course: CourseId::new(3)
            }
        );
        assert_eq!(view.viewer.id, Some(UserId::new(2)));
        assert!(!view.viewer.is_admin);
    }

    #[test]
    fn rejects_a_fixture_without_a_site() {
        let result = Fixture::parse("[[courses]]\nid = 3\n");
        assert!(result.is_err());
    }
}
