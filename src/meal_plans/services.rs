use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{DayPlan, MealSlot, PlanSummary, PlannedRecipe},
    repo_types::{NewPlanEntry, PlanEntryView},
};
use crate::{
    config::PlannerConfig,
    errors::PlanError,
    goals::repo_types::Goal,
    nutrition::{self, ActivityLevel, BodyProfile},
    recipes::repo_types::Recipe,
    store::{GoalStore, MealPlanStore, RecipeStore, UserStore},
    users::repo_types::User,
};

pub const DAYS_PER_PLAN: usize = 7;

/// Builds a week of meals for one goal and stores it in place of the previous plan.
pub struct MealPlanGenerator {
    users: Arc<dyn UserStore>,
    goals: Arc<dyn GoalStore>,
    recipes: Arc<dyn RecipeStore>,
    plans: Arc<dyn MealPlanStore>,
    config: PlannerConfig,
}

impl MealPlanGenerator {
    pub fn new(
        users: Arc<dyn UserStore>,
        goals: Arc<dyn GoalStore>,
        recipes: Arc<dyn RecipeStore>,
        plans: Arc<dyn MealPlanStore>,
        config: PlannerConfig,
    ) -> Self {
        Self {
            users,
            goals,
            recipes,
            plans,
            config,
        }
    }

    /// Wires every seam to the same store.
    pub fn with_store<S>(store: Arc<S>, config: PlannerConfig) -> Self
    where
        S: UserStore + GoalStore + RecipeStore + MealPlanStore + 'static,
    {
        Self::new(store.clone(), store.clone(), store.clone(), store, config)
    }

    #[instrument(skip(self))]
    pub async fn generate(&self, user_id: Uuid, goal_id: Uuid) -> Result<PlanSummary, PlanError> {
        let user = self
            .users
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| PlanError::user_not_found(user_id))?;
        let goal = self
            .goals
            .find_goal_by_id(goal_id)
            .await?
            .filter(|g| g.user_id == user_id)
            .ok_or_else(|| PlanError::goal_not_found(goal_id))?;

        let profile = body_profile(&user)?;
        let (meals_per_day, activity) = check_goal(&goal)?;

        let targets = nutrition::daily_calories(
            self.config.calorie_formula,
            &profile,
            activity,
            goal.desired_weight_kg,
        );
        let per_meal = targets.daily / f64::from(meals_per_day);
        let min_kcal = per_meal - self.config.calorie_window;
        let max_kcal = per_meal + self.config.calorie_window;
        let bundle = self.config.recipes_per_meal as usize;
        let required = DAYS_PER_PLAN * meals_per_day as usize * bundle;
        debug!(
            goal = %goal.id,
            daily = targets.daily,
            per_meal,
            min_kcal,
            max_kcal,
            required,
            "calorie targets computed"
        );

        let limit = i64::try_from(required).map_err(|e| PlanError::Storage(e.into()))?;
        let candidates = self
            .recipes
            .find_recipes_by_calorie_range(min_kcal, max_kcal, limit)
            .await?;
        if candidates.len() < required {
            warn!(required, found = candidates.len(), "not enough recipes in calorie window");
            return Err(PlanError::InsufficientCandidates {
                required,
                found: candidates.len(),
                min_kcal,
                max_kcal,
            });
        }

        let weekly_plan = allocate_week(&candidates[..required], meals_per_day, bundle);
        let entries = plan_entries(&weekly_plan);
        self.plans
            .replace_meal_plan(user_id, goal_id, &entries)
            .await?;
        info!(entries = entries.len(), "meal plan stored");

        Ok(PlanSummary {
            user_id,
            goal_id,
            bmi: nutrition::round2(nutrition::bmi(profile.weight_kg, profile.height_cm)),
            bmr: nutrition::round2(targets.bmr),
            maintenance_calories: nutrition::round2(targets.maintenance),
            daily_calories: nutrition::round2(targets.daily),
            calories_per_meal: nutrition::round2(per_meal),
            meals_per_day,
            recipes_per_meal: self.config.recipes_per_meal,
            activity_level: activity,
            calorie_formula: self.config.calorie_formula,
            weekly_plan,
        })
    }

    #[instrument(skip(self))]
    pub async fn plan_for_user(&self, user_id: Uuid) -> Result<Vec<PlanEntryView>, PlanError> {
        if self.users.find_user_by_id(user_id).await?.is_none() {
            return Err(PlanError::user_not_found(user_id));
        }
        Ok(self.plans.list_plan_for_user(user_id).await?)
    }
}

fn body_profile(user: &User) -> Result<BodyProfile, PlanError> {
    if !(user.height_cm.is_finite() && user.height_cm > 0.0) {
        return Err(PlanError::InvalidProfile("height must be positive".into()));
    }
    if !(user.weight_kg.is_finite() && user.weight_kg > 0.0) {
        return Err(PlanError::InvalidProfile("weight must be positive".into()));
    }
    if user.age < 0 {
        return Err(PlanError::InvalidProfile("age must not be negative".into()));
    }
    Ok(user.body_profile())
}

fn check_goal(goal: &Goal) -> Result<(i16, ActivityLevel), PlanError> {
    if goal.meals_per_day < 1 {
        return Err(PlanError::InvalidGoal(
            "number of meals per day must be at least 1".into(),
        ));
    }
    let meals_per_day = i16::try_from(goal.meals_per_day)
        .map_err(|_| PlanError::InvalidGoal("number of meals per day is too large".into()))?;

    let activity = match goal.activity_level.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => ActivityLevel::parse(raw),
        _ => return Err(PlanError::InvalidGoal("activity level is missing".into())),
    };

    if let (Some(start), Some(end)) = (goal.start_date, goal.end_date) {
        if end < start {
            return Err(PlanError::InvalidGoal("end date is before start date".into()));
        }
    }
    Ok((meals_per_day, activity))
}

/// Slices `candidates` into consecutive bundles of `bundle` and lays them out day by day,
/// meal by meal. Same input, same plan.
pub fn allocate_week(candidates: &[Recipe], meals_per_day: i16, bundle: usize) -> Vec<DayPlan> {
    let mut groups = candidates.chunks(bundle);
    (1..=DAYS_PER_PLAN as i16)
        .map(|day| DayPlan {
            day,
            meals: (1..=meals_per_day)
                .map(|meal_order| MealSlot {
                    meal_order,
                    recipes: groups
                        .next()
                        .map(|g| g.iter().map(PlannedRecipe::from).collect())
                        .unwrap_or_default(),
                })
                .collect(),
        })
        .collect()
}

fn plan_entries(week: &[DayPlan]) -> Vec<NewPlanEntry> {
    week.iter()
        .flat_map(|d| {
            d.meals.iter().flat_map(move |m| {
                m.recipes.iter().zip(1i16..).map(move |(r, slot)| NewPlanEntry {
                    recipe_id: r.id,
                    day: d.day,
                    meal_order: m.meal_order,
                    slot,
                })
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{config::CalorieFormula, store::memory::MemoryStore};

    // 80 kg, 180 cm, 30 y male, moderate, losing weight, 3 meals:
    // (1780 * 1.55 - 500) / 3 = 753 kcal per meal.
    struct Fixture {
        store: Arc<MemoryStore>,
        user_id: Uuid,
        goal_id: Uuid,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::default());
        let user_id = store.add_user(80.0, 180.0, 30, true);
        let goal_id = store.add_goal(user_id, 75.0, Some("moderate"), 3);
        Fixture {
            store,
            user_id,
            goal_id,
        }
    }

    fn generator(store: &Arc<MemoryStore>) -> MealPlanGenerator {
        MealPlanGenerator::with_store(store.clone(), PlannerConfig::default())
    }

    fn key_of(rows: &[PlanEntryView]) -> Vec<(Uuid, i16, i16, i16)> {
        let mut keys: Vec<_> = rows
            .iter()
            .map(|e| (e.recipe_id, e.day, e.meal_order, e.slot))
            .collect();
        keys.sort();
        keys
    }

    #[tokio::test]
    async fn generates_full_week_grid() {
        let f = fixture();
        f.store.add_recipes(63, 750.0);

        let summary = generator(&f.store).generate(f.user_id, f.goal_id).await.unwrap();

        assert_eq!(summary.bmi, 24.69);
        assert_eq!(summary.bmr, 1780.0);
        assert_eq!(summary.daily_calories, 2259.0);
        assert_eq!(summary.calories_per_meal, 753.0);
        assert_eq!(summary.meals_per_day, 3);
        assert_eq!(summary.activity_level, ActivityLevel::Moderate);
        assert_eq!(summary.weekly_plan.len(), 7);
        assert!(summary
            .weekly_plan
            .iter()
            .all(|d| d.meals.len() == 3 && d.meals.iter().all(|m| m.recipes.len() == 3)));

        let rows = f.store.plan_rows(f.user_id, f.goal_id);
        assert_eq!(rows.len(), 63);
        let meal_orders: HashSet<i16> = rows.iter().map(|e| e.meal_order).collect();
        assert_eq!(meal_orders, HashSet::from([1, 2, 3]));
        let cells: HashSet<(i16, i16)> = rows.iter().map(|e| (e.day, e.meal_order)).collect();
        assert_eq!(cells.len(), 21);
    }

    #[tokio::test]
    async fn allocation_walks_candidates_in_order() {
        let f = fixture();
        let ids = f.store.add_recipes(63, 760.0);

        let summary = generator(&f.store).generate(f.user_id, f.goal_id).await.unwrap();

        let first: Vec<Uuid> = summary.weekly_plan[0].meals[0].recipes.iter().map(|r| r.id).collect();
        assert_eq!(first, ids[0..3]);
        let day2_meal1: Vec<Uuid> = summary.weekly_plan[1].meals[0].recipes.iter().map(|r| r.id).collect();
        assert_eq!(day2_meal1, ids[9..12]);
        let last: Vec<Uuid> = summary.weekly_plan[6].meals[2].recipes.iter().map(|r| r.id).collect();
        assert_eq!(last, ids[60..63]);
    }

    #[tokio::test]
    async fn regenerating_replaces_instead_of_appending() {
        let f = fixture();
        f.store.add_recipes(70, 750.0);
        let planner = generator(&f.store);

        planner.generate(f.user_id, f.goal_id).await.unwrap();
        let once = key_of(&f.store.plan_rows(f.user_id, f.goal_id));
        planner.generate(f.user_id, f.goal_id).await.unwrap();
        let twice = key_of(&f.store.plan_rows(f.user_id, f.goal_id));

        assert_eq!(once.len(), 63);
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn concurrent_generation_for_same_goal_leaves_one_plan() {
        let f = fixture();
        f.store.add_recipes(63, 750.0);
        let planner = generator(&f.store);

        let (a, b) = tokio::join!(
            planner.generate(f.user_id, f.goal_id),
            planner.generate(f.user_id, f.goal_id)
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(f.store.plan_rows(f.user_id, f.goal_id).len(), 63);
    }

    #[tokio::test]
    async fn missing_user_is_not_found_whatever_the_goal() {
        let f = fixture();
        let stranger = Uuid::new_v4();

        for goal_id in [f.goal_id, Uuid::new_v4()] {
            let err = generator(&f.store).generate(stranger, goal_id).await.unwrap_err();
            assert!(matches!(err, PlanError::NotFound { entity: "user", id } if id == stranger));
        }
    }

    #[tokio::test]
    async fn missing_or_foreign_goal_is_not_found() {
        let f = fixture();
        let other_user = f.store.add_user(60.0, 165.0, 40, false);
        let foreign_goal = f.store.add_goal(other_user, 55.0, Some("light"), 2);

        let err = generator(&f.store).generate(f.user_id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, PlanError::NotFound { entity: "goal", .. }));

        let err = generator(&f.store).generate(f.user_id, foreign_goal).await.unwrap_err();
        assert!(matches!(err, PlanError::NotFound { entity: "goal", .. }));
    }

    #[tokio::test]
    async fn rejects_non_positive_meal_count() {
        let f = fixture();
        f.store.add_recipes(63, 750.0);
        for meals in [0, -2] {
            f.store.update_goal(f.goal_id, |g| g.meals_per_day = meals);
            let err = generator(&f.store).generate(f.user_id, f.goal_id).await.unwrap_err();
            assert!(matches!(err, PlanError::InvalidGoal(_)));
        }
        assert!(f.store.plan_rows(f.user_id, f.goal_id).is_empty());
    }

    #[tokio::test]
    async fn missing_activity_level_is_invalid_but_unknown_defaults() {
        let f = fixture();
        f.store.add_recipes(63, 580.0);

        f.store.update_goal(f.goal_id, |g| g.activity_level = None);
        let err = generator(&f.store).generate(f.user_id, f.goal_id).await.unwrap_err();
        assert!(matches!(err, PlanError::InvalidGoal(_)));

        // (1780 * 1.2 - 500) / 3 = 545.33
        f.store
            .update_goal(f.goal_id, |g| g.activity_level = Some("extreme".into()));
        let summary = generator(&f.store).generate(f.user_id, f.goal_id).await.unwrap();
        assert_eq!(summary.activity_level, ActivityLevel::Sedentary);
        assert_eq!(summary.calories_per_meal, 545.33);
    }

    #[tokio::test]
    async fn end_before_start_is_invalid() {
        let f = fixture();
        f.store.update_goal(f.goal_id, |g| {
            g.start_date = Some(time::macros::date!(2025 - 03 - 01));
            g.end_date = Some(time::macros::date!(2025 - 02 - 01));
        });
        let err = generator(&f.store).generate(f.user_id, f.goal_id).await.unwrap_err();
        assert!(matches!(err, PlanError::InvalidGoal(_)));
    }

    #[tokio::test]
    async fn zero_height_is_an_invalid_profile() {
        let store = Arc::new(MemoryStore::default());
        let user_id = store.add_user(70.0, 0.0, 30, true);
        let goal_id = store.add_goal(user_id, 70.0, Some("light"), 3);
        let err = generator(&store).generate(user_id, goal_id).await.unwrap_err();
        assert!(matches!(err, PlanError::InvalidProfile(_)));
    }

    #[tokio::test]
    async fn short_catalog_fails_and_keeps_previous_plan() {
        let f = fixture();
        f.store.add_recipes(63, 750.0);
        f.store.add_recipes(100, 1200.0);
        let planner = generator(&f.store);
        planner.generate(f.user_id, f.goal_id).await.unwrap();
        let before = key_of(&f.store.plan_rows(f.user_id, f.goal_id));

        // 4 meals: 2259 / 4 = 564.75 kcal, window 464.75..=664.75 matches nothing.
        f.store.update_goal(f.goal_id, |g| g.meals_per_day = 4);
        let err = planner.generate(f.user_id, f.goal_id).await.unwrap_err();
        match err {
            PlanError::InsufficientCandidates { required, found, .. } => {
                assert_eq!(required, 84);
                assert_eq!(found, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(key_of(&f.store.plan_rows(f.user_id, f.goal_id)), before);
    }

    #[tokio::test]
    async fn one_short_of_a_full_week_is_insufficient() {
        let f = fixture();
        f.store.add_recipes(62, 753.0);
        let err = generator(&f.store).generate(f.user_id, f.goal_id).await.unwrap_err();
        assert!(matches!(
            err,
            PlanError::InsufficientCandidates { required: 63, found: 62, .. }
        ));
        assert!(f.store.plan_rows(f.user_id, f.goal_id).is_empty());
    }

    #[tokio::test]
    async fn write_failure_surfaces_as_storage_error() {
        let f = fixture();
        f.store.add_recipes(63, 750.0);
        let planner = generator(&f.store);
        planner.generate(f.user_id, f.goal_id).await.unwrap();

        f.store.set_fail_writes(true);
        let err = planner.generate(f.user_id, f.goal_id).await.unwrap_err();
        assert!(matches!(err, PlanError::Storage(_)));
        assert_eq!(f.store.plan_rows(f.user_id, f.goal_id).len(), 63);
    }

    #[tokio::test]
    async fn single_recipe_bundles_and_baseline_formula() {
        let f = fixture();
        // (2000 + 5 * 110) * 1.55 / 3 = 1317.5 kcal
        f.store.add_recipes(21, 1300.0);
        let config = PlannerConfig {
            calorie_formula: CalorieFormula::Baseline,
            recipes_per_meal: 1,
            ..PlannerConfig::default()
        };
        let planner = MealPlanGenerator::with_store(f.store.clone(), config);

        let summary = planner.generate(f.user_id, f.goal_id).await.unwrap();
        assert_eq!(summary.calories_per_meal, 1317.5);
        assert_eq!(summary.calorie_formula, CalorieFormula::Baseline);
        assert_eq!(f.store.plan_rows(f.user_id, f.goal_id).len(), 21);
    }

    #[tokio::test]
    async fn plan_for_user_lists_entries_in_plan_order() {
        let f = fixture();
        f.store.add_recipes(63, 750.0);
        let planner = generator(&f.store);
        planner.generate(f.user_id, f.goal_id).await.unwrap();

        let rows = planner.plan_for_user(f.user_id).await.unwrap();
        assert_eq!(rows.len(), 63);
        assert_eq!((rows[0].day, rows[0].meal_order, rows[0].slot), (1, 1, 1));
        assert_eq!((rows[62].day, rows[62].meal_order, rows[62].slot), (7, 3, 3));

        let err = planner.plan_for_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, PlanError::NotFound { entity: "user", .. }));
    }

    #[test]
    fn plan_entries_number_slots_within_each_meal() {
        let recipes: Vec<Recipe> = (0..14)
            .map(|i| Recipe {
                id: Uuid::new_v4(),
                title: format!("r{i}"),
                category: None,
                calories: 500.0,
                protein_g: None,
                carbs_g: None,
                fat_g: None,
                created_at: time::OffsetDateTime::now_utc(),
            })
            .collect();
        let week = allocate_week(&recipes, 1, 2);
        let entries = plan_entries(&week);
        assert_eq!(entries.len(), 14);
        assert_eq!(entries[0].recipe_id, recipes[0].id);
        assert_eq!((entries[1].day, entries[1].slot), (1, 2));
        assert_eq!((entries[2].day, entries[2].slot), (2, 1));
        assert!(entries.iter().all(|e| e.meal_order == 1));
    }
}
