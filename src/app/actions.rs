#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,

    ListUp,
    ListDown,
    GoTop,
    GoBottom,
    PlaySelected,
    RemoveSelected,
    ToggleFavorite,
    ToggleFavoritesOnly,

    StartSearch,
    SearchInput(char),
    SearchBackspace,
    ConfirmSearch,
    CancelSearch,

    TogglePause,
    Stop,
    PlayNext,
    PlayPrev,
    SeekForward,
    SeekBack,
    VolumeUp,
    VolumeDown,
    ToggleMute,
    CycleRepeat,
    ToggleShuffle,

    DismissDialog,
    Resize,
}
