// Тексты бота

pub const WELCOME_TEXT: &str = "Привет! Я бот студенческого актива 👋\n\n\
Здесь можно зарегистрироваться, рассказать о мероприятиях, в которых ты участвуешь, \
и похвастаться своими достижениями. Выбирай ниже 👇";

pub const RAND_MESSAGES: &[&str] = &[
    "{name}, привет! Не забудь рассказать о мероприятиях, в которых ты участвовал 🙌",
    "{name}, есть новые достижения? Самое время похвастаться!",
    "{name}, загляни в список предстоящих мероприятий, там может быть что-то интересное.",
    "{name}, знаешь о мероприятии, которого нет в боте? Сообщи о нём!",
    "Как дела, {name}? Обнови информацию о себе, если что-то изменилось.",
];

pub const UNKNOWN_INPUT: &str = "Не понимаю 🤔 Нажмите /start, чтобы открыть меню.";
pub const DIALOGUE_CANCELLED: &str = "Ввод отменён.";
pub const NOTHING_TO_CANCEL: &str = "Нечего отменять.";
pub const DIALOGUE_EXPIRED: &str = "Время ввода истекло, начните заново.";
pub const INTERNAL_ERROR: &str = "Произошла ошибка, попробуйте позже.";
pub const NOT_ADMIN: &str = "У вас нет прав администратора.";
pub const REGISTER_FIRST: &str = "Пожалуйста, сначала зарегистрируйтесь.";
pub const REGISTER_TO_CONTINUE: &str = "Зарегистрируйтесь, чтобы продолжить.";

// регистрация и профиль
pub const ASK_FIRST_NAME: &str = "Введите ваше имя:";
pub const ASK_LAST_NAME: &str = "Введите вашу фамилию:";
pub const ASK_GROUP: &str = "Введите номер группы:";
pub const ASK_NEW_FIRST_NAME: &str = "Введите ваше новое имя:";
pub const ASK_NEW_LAST_NAME: &str = "Введите вашу новую фамилию:";
pub const ASK_NEW_GROUP: &str = "Введите ваш новый номер группы:";
pub const EMPTY_FIRST_NAME: &str = "Имя не может быть пустым. Пожалуйста, введите ваше имя:";
pub const EMPTY_LAST_NAME: &str = "Фамилия не может быть пустой. Пожалуйста, введите вашу фамилию:";
pub const EMPTY_GROUP: &str = "Номер группы не может быть пустым. Пожалуйста, введите номер группы:";
pub const REGISTERED: &str = "Вы успешно зарегистрированы!";
pub const ALREADY_REGISTERED: &str = "Вы уже зарегистрированы.";
pub const PROFILE_UPDATED: &str = "Ваша информация успешно обновлена!";
pub const PROFILE_NOT_FOUND: &str = "Информация о вас не найдена. Пожалуйста, зарегистрируйтесь.";

// мероприятия
pub const ASK_TITLE: &str = "Введите название мероприятия:";
pub const ASK_DESCRIPTION: &str = "Введите описание мероприятия:";
pub const ASK_DATE: &str = "Введите дату проведения мероприятия (ГГГГ-ММ-ДД):";
pub const ASK_LOCATION: &str = "Введите место проведения мероприятия:";
pub const ASK_SURVEY_LINK: &str = "Введите ссылку на опросник для мероприятия:";
pub const ASK_LEVEL: &str =
    "Введите уровень мероприятия (например, локальный, региональный, всероссийский, международный):";
pub const ASK_CATEGORY: &str =
    "Введите категорию мероприятия (например, научная конференция, олимпиада, спортивное и т. д.):";
pub const EMPTY_TITLE: &str = "Название мероприятия не может быть пустым. Пожалуйста, введите название:";
pub const BAD_DATE: &str = "Неверный формат даты. Пожалуйста, введите дату в формате ГГГГ-ММ-ДД:";
pub const EMPTY_LOCATION: &str = "Место проведения не может быть пустым. Пожалуйста, введите место:";
pub const EMPTY_SURVEY_LINK: &str = "Ссылка на опросник не может быть пустой. Пожалуйста, введите ссылку:";
pub const EMPTY_LEVEL: &str = "Уровень мероприятия не может быть пустым. Пожалуйста, введите уровень:";
pub const EMPTY_CATEGORY: &str = "Категория мероприятия не может быть пустой. Пожалуйста, введите категорию:";
pub const EVENT_SAVED: &str = "Информация о мероприятии успешно сохранена и ожидает подтверждения.";

pub const ASK_NEW_TITLE: &str = "Введите новое название мероприятия:";
pub const ASK_NEW_DESCRIPTION: &str = "Введите новое описание мероприятия:";
pub const ASK_NEW_DATE: &str = "Введите новую дату (ГГГГ-ММ-ДД):";
pub const ASK_NEW_LOCATION: &str = "Введите новое место проведения мероприятия:";
pub const ASK_NEW_SURVEY_LINK: &str = "Введите новую ссылку на опросник (может быть пусто, отправьте «-»):";
pub const ASK_NEW_LEVEL: &str =
    "Введите новый уровень мероприятия (локальный, региональный, всероссийский, международный):";
pub const ASK_NEW_CATEGORY: &str =
    "Введите новую категорию мероприятия (научная конференция, олимпиада, спортивное и т. д.):";
pub const EVENT_UPDATED: &str = "Мероприятие успешно обновлено.";
pub const EVENT_NOT_FOUND: &str = "Ошибка: мероприятие не найдено.";

// достижения
pub const ASK_PLACE: &str = "Введите место, которое вы заняли (1-е, 2-е, 3-е место и т.д.):";
pub const EMPTY_PLACE: &str = "Место не может быть пустым. Пожалуйста, введите место:";
pub const ACHIEVEMENT_SENT: &str = "Ваше достижение успешно передано администрации!";
pub const ACHIEVEMENT_DUPLICATE: &str = "Вы уже отправляли достижение по этому мероприятию.";
pub const ACHIEVEMENT_NOT_FOUND: &str = "Ошибка: достижение не найдено.";

pub const NOT_SPECIFIED_M: &str = "Не указан";
pub const NOT_SPECIFIED_F: &str = "Не указана";
pub const NO_LINK: &str = "Нет ссылки";
