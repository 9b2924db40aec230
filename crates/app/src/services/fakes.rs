//! In-memory repository used by the service tests.
//!
//! Mirrors the storage adapter's transactional behaviour (toggles adjust
//! their counters, blocks sever follows, default addresses stay unique)
//! closely enough for the services' policy to be exercised.

use std::collections::{HashMap, HashSet};
use std::future::{Future, ready};
use std::sync::{Mutex, MutexGuard};

use community_domain::address::{Address, AddressForm};
use community_domain::category::{Category, NewCategory};
use community_domain::error::CommunityError;
use community_domain::id::{AddressId, CategoryId, PostId, TagId, UserId};
use community_domain::message::NewMessage;
use community_domain::moderation::{Audit, AuditEntry, AuditStatus, Review};
use community_domain::page::{PageRequest, Paged};
use community_domain::post::{NewPost, Post, PostFilter, PostView};
use community_domain::relation::{Edge, Toggle};
use community_domain::status::Status;
use community_domain::tag::{Tag, TagSort};
use community_domain::time::{Timestamp, now};
use community_domain::user::{NewUser, ProfileUpdate, RelatedUser, User};

use crate::ports::{
    AddressRepository, AuditRepository, BlacklistRepository, CategoryRepository, FollowRepository,
    LikeRepository, PostRepository, TagRepository, UserRepository,
};
use crate::services::auth_service::tests::user as make_user;

type Reply<T> = Result<T, CommunityError>;

#[derive(Default)]
struct State {
    next_id: i64,
    users: HashMap<UserId, User>,
    posts: HashMap<PostId, Post>,
    categories: HashMap<CategoryId, Category>,
    likes: HashSet<(PostId, UserId)>,
    follows: HashSet<(UserId, UserId)>,
    blocks: HashSet<(UserId, UserId)>,
    messages: Vec<NewMessage>,
    addresses: HashMap<AddressId, Address>,
    audits: HashMap<PostId, Audit>,
    tags: HashMap<TagId, Tag>,
    post_tags: HashSet<(PostId, TagId)>,
}

impl State {
    fn next(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user_mut(&mut self, id: UserId) -> Option<&mut User> {
        self.users.get_mut(&id)
    }

    fn related(&self, id: UserId) -> Option<RelatedUser> {
        self.users.get(&id).map(|u| RelatedUser {
            id: u.id,
            nickname: u.nickname.clone(),
            avatar: u.avatar.clone(),
            bio: u.bio.clone(),
            since: now(),
        })
    }

    fn view(&self, post: &Post, viewer: Option<UserId>) -> PostView {
        PostView {
            post: post.clone(),
            nickname: None,
            avatar: None,
            category_name: self.categories.get(&post.category_id).map(|c| c.name.clone()),
            extension: None,
            tags: None,
            is_liked: viewer.map(|v| self.likes.contains(&(post.id, v))),
            is_favorite: viewer.map(|_| false),
        }
    }

    fn clear_default_address(&mut self, user: UserId) {
        for address in self.addresses.values_mut().filter(|a| a.user_id == user) {
            address.is_default = false;
        }
    }
}

#[derive(Default)]
pub(crate) struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub(crate) fn add_user(&self, id: i64) {
        self.lock()
            .users
            .insert(UserId::new(id), make_user(id, &format!("user{id}")));
    }

    pub(crate) fn user(&self, id: i64) -> Option<User> {
        self.lock().users.get(&UserId::new(id)).cloned()
    }

    pub(crate) fn add_category(&self, id: i64, status: Status) {
        let category = Category {
            id: CategoryId::new(id),
            name: format!("category{id}"),
            description: None,
            image: None,
            sort: 0,
            post_count: 0,
            status,
            created_at: now(),
            updated_at: now(),
        };
        self.lock().categories.insert(category.id, category);
    }

    pub(crate) fn category(&self, id: i64) -> Option<Category> {
        self.lock().categories.get(&CategoryId::new(id)).cloned()
    }

    pub(crate) fn post(&self, id: PostId) -> Option<Post> {
        self.lock().posts.get(&id).cloned()
    }

    pub(crate) fn tag(&self, id: TagId) -> Option<Tag> {
        self.lock().tags.get(&id).cloned()
    }

    pub(crate) fn messages(&self) -> Vec<NewMessage> {
        self.lock().messages.clone()
    }
}

/// A general post by `user` in `category`.
pub(crate) fn new_post(user: i64, category: i64) -> NewPost {
    NewPost {
        user_id: UserId::new(user),
        category_id: CategoryId::new(category),
        title: "Bike".to_string(),
        description: None,
        content: "City bike in good shape".to_string(),
        images: Vec::new(),
        location: None,
        ip: None,
        extension: None,
        created_at: now(),
    }
}

/// Insert a visible post by `user` and return its id.
pub(crate) fn seed_post(store: &MemoryStore, user: i64) -> PostId {
    let mut state = store.lock();
    let id = PostId::new(state.next() + 1000);
    let new = new_post(user, 1);
    state.posts.insert(id, post_from(id, new));
    id
}

fn post_from(id: PostId, new: NewPost) -> Post {
    Post {
        id,
        user_id: new.user_id,
        category_id: new.category_id,
        post_type: new.post_type(),
        title: new.title,
        description: new.description,
        content: new.content,
        images: new.images,
        location: new.location,
        ip: new.ip,
        view_num: 0,
        like_num: 0,
        share_num: 0,
        favorite_num: 0,
        comment_num: 0,
        status: Status::Normal,
        is_stick: false,
        is_recommend: false,
        created_at: new.created_at,
        updated_at: new.created_at,
    }
}

fn page_of<T>(mut items: Vec<T>, page: PageRequest) -> Paged<T> {
    let total = i64::try_from(items.len()).unwrap();
    let offset = usize::try_from(page.offset()).unwrap().min(items.len());
    let limit = usize::try_from(page.limit()).unwrap();
    let list: Vec<T> = items.drain(offset..).take(limit).collect();
    Paged::new(total, list)
}

impl UserRepository for MemoryStore {
    fn create_user(&self, new: NewUser) -> impl Future<Output = Reply<UserId>> + Send {
        let mut state = self.lock();
        let id = UserId::new(state.next());
        let mut user = make_user(id.get(), &new.username);
        user.password_hash = new.password_hash;
        user.mobile = new.mobile;
        state.users.insert(id, user);
        ready(Ok(id))
    }

    fn find_user(&self, id: UserId) -> impl Future<Output = Reply<Option<User>>> + Send {
        ready(Ok(self.lock().users.get(&id).cloned()))
    }

    fn find_user_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Reply<Option<User>>> + Send {
        let found = self
            .lock()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned();
        ready(Ok(found))
    }

    fn find_user_by_mobile(
        &self,
        mobile: &str,
    ) -> impl Future<Output = Reply<Option<User>>> + Send {
        let found = self
            .lock()
            .users
            .values()
            .find(|u| u.mobile.as_deref() == Some(mobile))
            .cloned();
        ready(Ok(found))
    }

    fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
        _at: Timestamp,
    ) -> impl Future<Output = Reply<()>> + Send {
        if let Some(user) = self.lock().user_mut(id) {
            user.nickname = Some(update.nickname);
        }
        ready(Ok(()))
    }

    fn update_password(
        &self,
        id: UserId,
        password_hash: String,
        _at: Timestamp,
    ) -> impl Future<Output = Reply<()>> + Send {
        if let Some(user) = self.lock().user_mut(id) {
            user.password_hash = password_hash;
        }
        ready(Ok(()))
    }

    fn record_login(&self, id: UserId, at: Timestamp) -> impl Future<Output = Reply<()>> + Send {
        if let Some(user) = self.lock().user_mut(id) {
            user.last_login_at = Some(at);
        }
        ready(Ok(()))
    }
}

impl PostRepository for MemoryStore {
    fn create_post(&self, new: NewPost) -> impl Future<Output = Reply<PostId>> + Send {
        let mut state = self.lock();
        let id = PostId::new(state.next());
        if let Some(category) = state.categories.get_mut(&new.category_id) {
            category.post_count += 1;
        }
        state.posts.insert(id, post_from(id, new));
        ready(Ok(id))
    }

    fn find_post(&self, id: PostId) -> impl Future<Output = Reply<Option<Post>>> + Send {
        ready(Ok(self.lock().posts.get(&id).cloned()))
    }

    fn view_post(
        &self,
        id: PostId,
        viewer: Option<UserId>,
    ) -> impl Future<Output = Reply<Option<PostView>>> + Send {
        let state = self.lock();
        let view = state
            .posts
            .get(&id)
            .filter(|p| p.status.is_visible())
            .map(|p| state.view(p, viewer));
        ready(Ok(view))
    }

    fn list_posts(
        &self,
        _filter: PostFilter,
        viewer: Option<UserId>,
        page: PageRequest,
    ) -> impl Future<Output = Reply<Paged<PostView>>> + Send {
        let state = self.lock();
        let mut posts: Vec<&Post> = state
            .posts
            .values()
            .filter(|p| p.status.is_visible())
            .collect();
        posts.sort_by_key(|p| std::cmp::Reverse((p.is_stick, p.id)));
        let views = posts.into_iter().map(|p| state.view(p, viewer)).collect();
        ready(Ok(page_of(views, page)))
    }

    fn list_user_posts(
        &self,
        author: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Reply<Paged<PostView>>> + Send {
        let state = self.lock();
        let mut posts: Vec<&Post> = state
            .posts
            .values()
            .filter(|p| p.status.is_visible() && p.user_id == author)
            .collect();
        posts.sort_by_key(|p| std::cmp::Reverse(p.id));
        let views = posts.into_iter().map(|p| state.view(p, None)).collect();
        ready(Ok(page_of(views, page)))
    }

    fn latest_posts(&self, limit: i64) -> impl Future<Output = Reply<Vec<PostView>>> + Send {
        let state = self.lock();
        let mut posts: Vec<&Post> = state
            .posts
            .values()
            .filter(|p| p.status.is_visible())
            .collect();
        posts.sort_by_key(|p| std::cmp::Reverse(p.id));
        let views = posts
            .into_iter()
            .take(usize::try_from(limit).unwrap())
            .map(|p| state.view(p, None))
            .collect();
        ready(Ok(views))
    }

    fn increment_views(&self, id: PostId) -> impl Future<Output = Reply<()>> + Send {
        if let Some(post) = self.lock().posts.get_mut(&id) {
            if post.status.is_visible() {
                post.view_num += 1;
            }
        }
        ready(Ok(()))
    }

    fn hide_post(&self, id: PostId, at: Timestamp) -> impl Future<Output = Reply<()>> + Send {
        let mut state = self.lock();
        let category = state.posts.get_mut(&id).map(|post| {
            post.status = Status::Hidden;
            post.updated_at = at;
            post.category_id
        });
        if let Some(category) = category.and_then(|id| state.categories.get_mut(&id)) {
            category.post_count = (category.post_count - 1).max(0);
        }
        ready(Ok(()))
    }
}

impl LikeRepository for MemoryStore {
    fn toggle_like(
        &self,
        post: PostId,
        user: UserId,
        notice: Option<NewMessage>,
    ) -> impl Future<Output = Reply<Toggle>> + Send {
        let mut state = self.lock();
        let liked = state.likes.insert((post, user));
        if !liked {
            state.likes.remove(&(post, user));
        }
        if let Some(p) = state.posts.get_mut(&post) {
            p.like_num = if liked { p.like_num + 1 } else { (p.like_num - 1).max(0) };
        }
        if liked {
            state.messages.extend(notice);
        }
        ready(Ok(Toggle::from_bool(liked)))
    }
}

impl CategoryRepository for MemoryStore {
    fn create_category(
        &self,
        new: NewCategory,
        at: Timestamp,
    ) -> impl Future<Output = Reply<CategoryId>> + Send {
        let mut state = self.lock();
        let id = CategoryId::new(state.next());
        state.categories.insert(
            id,
            Category {
                id,
                name: new.name,
                description: new.description,
                image: new.image,
                sort: new.sort,
                post_count: 0,
                status: Status::Normal,
                created_at: at,
                updated_at: at,
            },
        );
        ready(Ok(id))
    }

    fn find_category(&self, id: CategoryId) -> impl Future<Output = Reply<Option<Category>>> + Send {
        ready(Ok(self.lock().categories.get(&id).cloned()))
    }

    fn find_category_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Reply<Option<Category>>> + Send {
        let found = self
            .lock()
            .categories
            .values()
            .find(|c| c.name == name)
            .cloned();
        ready(Ok(found))
    }

    fn update_category(
        &self,
        category: Category,
        _at: Timestamp,
    ) -> impl Future<Output = Reply<()>> + Send {
        self.lock().categories.insert(category.id, category);
        ready(Ok(()))
    }

    fn delete_category(&self, id: CategoryId) -> impl Future<Output = Reply<()>> + Send {
        self.lock().categories.remove(&id);
        ready(Ok(()))
    }

    fn count_category_posts(&self, id: CategoryId) -> impl Future<Output = Reply<i64>> + Send {
        let count = self
            .lock()
            .posts
            .values()
            .filter(|p| p.category_id == id)
            .count();
        ready(Ok(i64::try_from(count).unwrap()))
    }

    fn list_categories(&self, status: Status) -> impl Future<Output = Reply<Vec<Category>>> + Send {
        let mut list: Vec<Category> = self
            .lock()
            .categories
            .values()
            .filter(|c| c.status == status)
            .cloned()
            .collect();
        list.sort_by_key(|c| (std::cmp::Reverse(c.sort), c.id));
        ready(Ok(list))
    }
}

impl FollowRepository for MemoryStore {
    fn toggle_follow(
        &self,
        user: UserId,
        target: UserId,
    ) -> impl Future<Output = Reply<Toggle>> + Send {
        let mut state = self.lock();
        let followed = state.follows.insert((user, target));
        if !followed {
            state.follows.remove(&(user, target));
        }
        let delta = if followed { 1 } else { -1 };
        if let Some(u) = state.user_mut(user) {
            u.follow_num = (u.follow_num + delta).max(0);
        }
        if let Some(t) = state.user_mut(target) {
            t.fans_num = (t.fans_num + delta).max(0);
        }
        ready(Ok(Toggle::from_bool(followed)))
    }

    fn is_following(
        &self,
        user: UserId,
        target: UserId,
    ) -> impl Future<Output = Reply<bool>> + Send {
        ready(Ok(self.lock().follows.contains(&(user, target))))
    }

    fn list_following(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Reply<Paged<RelatedUser>>> + Send {
        let state = self.lock();
        let list = state
            .follows
            .iter()
            .filter(|(from, _)| *from == user)
            .filter_map(|(_, to)| state.related(*to))
            .collect();
        ready(Ok(page_of(list, page)))
    }

    fn list_fans(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Reply<Paged<RelatedUser>>> + Send {
        let state = self.lock();
        let list = state
            .follows
            .iter()
            .filter(|(_, to)| *to == user)
            .filter_map(|(from, _)| state.related(*from))
            .collect();
        ready(Ok(page_of(list, page)))
    }
}

impl BlacklistRepository for MemoryStore {
    fn toggle_block(
        &self,
        user: UserId,
        target: UserId,
    ) -> impl Future<Output = Reply<Toggle>> + Send {
        let mut state = self.lock();
        let blocked = state.blocks.insert((user, target));
        if blocked {
            for edge in Edge::between(user, target) {
                if state.follows.remove(&(edge.from, edge.to)) {
                    if let Some(from) = state.user_mut(edge.from) {
                        from.follow_num = (from.follow_num - 1).max(0);
                    }
                    if let Some(to) = state.user_mut(edge.to) {
                        to.fans_num = (to.fans_num - 1).max(0);
                    }
                }
            }
        } else {
            state.blocks.remove(&(user, target));
        }
        ready(Ok(Toggle::from_bool(blocked)))
    }

    fn is_blocked(&self, user: UserId, target: UserId) -> impl Future<Output = Reply<bool>> + Send {
        ready(Ok(self.lock().blocks.contains(&(user, target))))
    }

    fn list_blocked(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> impl Future<Output = Reply<Paged<RelatedUser>>> + Send {
        let state = self.lock();
        let list = state
            .blocks
            .iter()
            .filter(|(from, _)| *from == user)
            .filter_map(|(_, to)| state.related(*to))
            .collect();
        ready(Ok(page_of(list, page)))
    }
}

impl AddressRepository for MemoryStore {
    fn list_addresses(&self, user: UserId) -> impl Future<Output = Reply<Vec<Address>>> + Send {
        let mut list: Vec<Address> = self
            .lock()
            .addresses
            .values()
            .filter(|a| a.user_id == user)
            .cloned()
            .collect();
        list.sort_by_key(|a| std::cmp::Reverse((a.is_default, a.id)));
        ready(Ok(list))
    }

    fn find_address(
        &self,
        user: UserId,
        id: AddressId,
    ) -> impl Future<Output = Reply<Option<Address>>> + Send {
        let found = self
            .lock()
            .addresses
            .get(&id)
            .filter(|a| a.user_id == user)
            .cloned();
        ready(Ok(found))
    }

    fn create_address(
        &self,
        user: UserId,
        form: AddressForm,
        at: Timestamp,
    ) -> impl Future<Output = Reply<AddressId>> + Send {
        let mut state = self.lock();
        let id = AddressId::new(state.next());
        if form.is_default {
            state.clear_default_address(user);
            if let Some(u) = state.user_mut(user) {
                u.default_address_id = Some(id);
            }
        }
        state.addresses.insert(
            id,
            Address {
                id,
                user_id: user,
                name: form.name,
                mobile: form.mobile,
                province: form.province,
                city: form.city,
                district: form.district,
                address: form.address,
                is_default: form.is_default,
                created_at: at,
                updated_at: at,
            },
        );
        ready(Ok(id))
    }

    fn update_address(
        &self,
        user: UserId,
        id: AddressId,
        form: AddressForm,
        at: Timestamp,
    ) -> impl Future<Output = Reply<()>> + Send {
        let mut state = self.lock();
        if form.is_default {
            state.clear_default_address(user);
        }
        if let Some(address) = state.addresses.get_mut(&id) {
            address.name = form.name;
            address.mobile = form.mobile;
            address.province = form.province;
            address.city = form.city;
            address.district = form.district;
            address.address = form.address;
            address.is_default = form.is_default;
            address.updated_at = at;
        }
        if let Some(u) = state.user_mut(user) {
            if form.is_default {
                u.default_address_id = Some(id);
            } else if u.default_address_id == Some(id) {
                u.default_address_id = None;
            }
        }
        ready(Ok(()))
    }

    fn delete_address(&self, user: UserId, id: AddressId) -> impl Future<Output = Reply<()>> + Send {
        let mut state = self.lock();
        state.addresses.remove(&id);
        if let Some(u) = state.user_mut(user) {
            if u.default_address_id == Some(id) {
                u.default_address_id = None;
            }
        }
        ready(Ok(()))
    }
}

impl AuditRepository for MemoryStore {
    fn find_audit(&self, post: PostId) -> impl Future<Output = Reply<Option<Audit>>> + Send {
        ready(Ok(self.lock().audits.get(&post).cloned()))
    }

    fn find_audit_entry(
        &self,
        post: PostId,
    ) -> impl Future<Output = Reply<Option<AuditEntry>>> + Send {
        let state = self.lock();
        let entry = state.audits.get(&post).and_then(|audit| {
            state.posts.get(&post).map(|p| AuditEntry {
                audit: audit.clone(),
                title: p.title.clone(),
                content: p.content.clone(),
                view_num: p.view_num,
                like_num: p.like_num,
                comment_num: p.comment_num,
                admin_name: None,
            })
        });
        ready(Ok(entry))
    }

    fn create_audit(&self, post: PostId, at: Timestamp) -> impl Future<Output = Reply<()>> + Send {
        self.lock().audits.insert(
            post,
            Audit {
                post_id: post,
                admin_id: None,
                status: AuditStatus::Pending,
                reason: None,
                created_at: at,
                updated_at: at,
            },
        );
        ready(Ok(()))
    }

    fn review_audit(
        &self,
        review: Review,
        notice: NewMessage,
    ) -> impl Future<Output = Reply<()>> + Send {
        let mut state = self.lock();
        if let Some(audit) = state.audits.get_mut(&review.post_id) {
            audit.status = review.decision.audit_status();
            audit.admin_id = Some(review.admin_id);
            audit.reason = review.reason;
            audit.updated_at = review.reviewed_at;
        }
        if let Some(post) = state.posts.get_mut(&review.post_id) {
            post.status = review.decision.post_status();
        }
        state.messages.push(notice);
        ready(Ok(()))
    }

    fn list_audits(
        &self,
        status: AuditStatus,
        page: PageRequest,
    ) -> impl Future<Output = Reply<Paged<AuditEntry>>> + Send {
        let state = self.lock();
        let list = state
            .audits
            .values()
            .filter(|a| a.status == status)
            .filter_map(|audit| {
                state.posts.get(&audit.post_id).map(|p| AuditEntry {
                    audit: audit.clone(),
                    title: p.title.clone(),
                    content: p.content.clone(),
                    view_num: p.view_num,
                    like_num: p.like_num,
                    comment_num: p.comment_num,
                    admin_name: None,
                })
            })
            .collect();
        ready(Ok(page_of(list, page)))
    }
}

impl TagRepository for MemoryStore {
    fn create_tag(&self, name: String, at: Timestamp) -> impl Future<Output = Reply<TagId>> + Send {
        let mut state = self.lock();
        let id = TagId::new(state.next());
        state.tags.insert(
            id,
            Tag {
                id,
                name,
                post_count: 0,
                created_at: at,
            },
        );
        ready(Ok(id))
    }

    fn find_tag(&self, id: TagId) -> impl Future<Output = Reply<Option<Tag>>> + Send {
        ready(Ok(self.lock().tags.get(&id).cloned()))
    }

    fn find_tag_by_name(&self, name: &str) -> impl Future<Output = Reply<Option<Tag>>> + Send {
        let found = self.lock().tags.values().find(|t| t.name == name).cloned();
        ready(Ok(found))
    }

    fn delete_tag(&self, id: TagId) -> impl Future<Output = Reply<()>> + Send {
        let mut state = self.lock();
        state.post_tags.retain(|(_, tag)| *tag != id);
        state.tags.remove(&id);
        ready(Ok(()))
    }

    fn list_tags(
        &self,
        _sort: TagSort,
        page: PageRequest,
    ) -> impl Future<Output = Reply<Paged<Tag>>> + Send {
        let mut list: Vec<Tag> = self.lock().tags.values().cloned().collect();
        list.sort_by_key(|t| std::cmp::Reverse(t.post_count));
        ready(Ok(page_of(list, page)))
    }

    fn hot_tags(&self, limit: i64) -> impl Future<Output = Reply<Vec<Tag>>> + Send {
        let mut list: Vec<Tag> = self
            .lock()
            .tags
            .values()
            .filter(|t| t.post_count > 0)
            .cloned()
            .collect();
        list.sort_by_key(|t| std::cmp::Reverse(t.post_count));
        list.truncate(usize::try_from(limit).unwrap());
        ready(Ok(list))
    }

    fn tags_for_post(&self, post: PostId) -> impl Future<Output = Reply<Vec<Tag>>> + Send {
        let state = self.lock();
        let mut list: Vec<Tag> = state
            .post_tags
            .iter()
            .filter(|(p, _)| *p == post)
            .filter_map(|(_, tag)| state.tags.get(tag).cloned())
            .collect();
        list.sort_by_key(|t| t.id);
        ready(Ok(list))
    }

    fn count_tags(&self, ids: Vec<TagId>) -> impl Future<Output = Reply<i64>> + Send {
        let state = self.lock();
        let count = ids.iter().filter(|id| state.tags.contains_key(id)).count();
        ready(Ok(i64::try_from(count).unwrap()))
    }

    fn set_post_tags(
        &self,
        post: PostId,
        tags: Vec<TagId>,
    ) -> impl Future<Output = Reply<()>> + Send {
        let mut state = self.lock();
        let mut touched: HashSet<TagId> = state
            .post_tags
            .iter()
            .filter(|(p, _)| *p == post)
            .map(|(_, t)| *t)
            .collect();
        state.post_tags.retain(|(p, _)| *p != post);
        for tag in tags {
            state.post_tags.insert((post, tag));
            touched.insert(tag);
        }
        for tag in touched {
            let count = state.post_tags.iter().filter(|(_, t)| *t == tag).count();
            if let Some(t) = state.tags.get_mut(&tag) {
                t.post_count = i64::try_from(count).unwrap();
            }
        }
        ready(Ok(()))
    }
}
